// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the service event bus.

use ember_common::service::{Event, EventBus};

#[test]
fn test_publish_and_take() {
    let bus = EventBus::new();
    bus.publish(Event::UsbConfigured);
    bus.publish(Event::EnterConfigMode);

    assert_eq!(bus.len(), 2);
    assert!(bus.take(Event::EnterConfigMode));
    assert!(!bus.take(Event::EnterConfigMode));
    assert!(bus.has_event(|e| *e == Event::UsbConfigured));
}

#[test]
fn test_consume_removes_matching_events() {
    let bus = EventBus::new();
    bus.publish(Event::UsbConfigured);
    bus.publish(Event::UsbDisconnected);
    bus.publish(Event::UsbConfigured);

    let mut seen = 0;
    bus.consume(|e| {
        let hit = matches!(e, Event::UsbConfigured);
        seen += hit as usize;
        hit
    });

    assert_eq!(seen, 2);
    assert_eq!(bus.len(), 1);
}

#[test]
fn test_full_bus_drops_new_events() {
    let bus = EventBus::new();
    for _ in 0..32 {
        bus.publish(Event::UsbConfigured);
    }
    bus.publish(Event::LeaveConfigMode);

    assert_eq!(bus.len(), 32);
    assert!(!bus.has_event(|e| *e == Event::LeaveConfigMode));
}
