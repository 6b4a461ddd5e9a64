// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Tests for the inbound receive session.

use ember_common::{ReceiveSession, RxEndpoint};

#[derive(Default)]
struct MockRx {
    arms: usize,
}

impl RxEndpoint for MockRx {
    fn arm(&mut self) {
        self.arms += 1;
    }
}

fn configured_session() -> ReceiveSession<4> {
    let mut rx = ReceiveSession::new();
    rx.set_configured(true);
    rx
}

#[test]
fn test_receive_returns_packet_in_order() {
    let mut rx = configured_session();
    let mut ep = MockRx::default();

    assert_eq!(rx.deliver(&[10, 20, 30]), 3);
    assert_eq!(rx.available(), 3);

    let bytes: Vec<u8> = (0..3).filter_map(|_| rx.receive_byte(&mut ep)).collect();
    assert_eq!(bytes, vec![10, 20, 30]);

    assert_eq!(rx.receive_byte(&mut ep), None);
    assert!(!rx.is_active());
    assert_eq!(ep.arms, 1);
}

#[test]
fn test_available_counts_down() {
    let mut rx = configured_session();
    let mut ep = MockRx::default();

    rx.deliver(&[1, 2]);
    assert_eq!(rx.available(), 2);
    rx.receive_byte(&mut ep);
    assert_eq!(rx.available(), 1);
    assert_eq!(ep.arms, 0);
    rx.receive_byte(&mut ep);
    assert_eq!(rx.available(), 0);
    assert_eq!(ep.arms, 1);
}

#[test]
fn test_unconfigured_session_reports_no_data() {
    let mut rx: ReceiveSession<4> = ReceiveSession::new();
    let mut ep = MockRx::default();

    rx.deliver(&[1, 2, 3]);
    assert_eq!(rx.available(), 0);
    assert_eq!(rx.receive_byte(&mut ep), None);
    assert_eq!(rx.peek(), None);
    assert_eq!(ep.arms, 0);
}

#[test]
fn test_deliver_rejected_while_active() {
    let mut rx = configured_session();

    rx.deliver(&[1, 2]);
    assert_eq!(rx.deliver(&[3, 4]), 0);
    assert_eq!(rx.peek(), Some(1));
}

#[test]
fn test_deliver_truncates_to_packet_buffer() {
    let mut rx = configured_session();

    assert_eq!(rx.deliver(&[1, 2, 3, 4, 5, 6]), 4);
    assert_eq!(rx.available(), 4);
}

#[test]
fn test_empty_packet_is_ignored() {
    let mut rx = configured_session();

    assert_eq!(rx.deliver(&[]), 0);
    assert!(!rx.is_active());
}

#[test]
fn test_peek_does_not_consume() {
    let mut rx = configured_session();
    let mut ep = MockRx::default();

    rx.deliver(&[7, 8]);
    assert_eq!(rx.peek(), Some(7));
    assert_eq!(rx.peek(), Some(7));
    assert_eq!(rx.receive_byte(&mut ep), Some(7));
    assert_eq!(rx.peek(), Some(8));
}

#[test]
fn test_disconnect_drops_current_packet() {
    let mut rx = configured_session();

    rx.deliver(&[1, 2, 3]);
    rx.set_configured(false);
    assert!(!rx.is_active());

    rx.set_configured(true);
    assert_eq!(rx.available(), 0);
    assert_eq!(rx.deliver(&[9]), 1);
}
