// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB bridge service: polls the device, feeds OUT packets to the serial
//! stream and runs the bridge pump.

use crate::peripherals::{Peripherals, PUMP_SIGNAL, STATUS};
use core::cell::Cell;
use ember_common::service::{Event, Service, ServiceContext};
use ember_common::MAX_PACKET_SIZE;

/// Reactor for pump requests and transmit completions
pub struct UsbBridgeService {
    configured: Cell<bool>,
}

impl UsbBridgeService {
    pub fn new() -> Self {
        Self {
            configured: Cell::new(false),
        }
    }

    fn track_device_state(&self, ctx: &mut ServiceContext<Peripherals>) {
        let p = &mut *ctx.peripherals;
        let configured = p.usb.is_configured();

        STATUS.set_socket_connected(configured);
        STATUS.set_device_acked(configured && p.usb.dtr());
        if !STATUS.device_acked() {
            STATUS.set_led_fade(false);
        }

        if configured == self.configured.get() {
            return;
        }
        self.configured.set(configured);
        // raises PUMP_SIGNAL on reconnect if output is still queued
        p.serial.set_configured(configured);

        if configured {
            defmt::println!("USB: configured");
            ctx.events.publish(Event::UsbConfigured);
        } else {
            defmt::println!("USB: disconnected");
            p.usb.abort_transmit();
            p.pump.reset_session();
            ctx.events.publish(Event::UsbDisconnected);
        }
    }

    fn receive(p: &mut Peripherals) {
        if !p.serial.wants_packet() {
            return;
        }

        let mut packet = [0u8; MAX_PACKET_SIZE];
        let count = p.usb.read_packet(&mut packet);
        if count > 0 {
            defmt::trace!("USB: received {} bytes", count);
            p.serial.deliver(&packet[..count]);
        }
    }

    fn transmit(p: &mut Peripherals) {
        if p.pump.is_busy() {
            if p.usb.transmit_complete() {
                p.pump.on_transmit_complete(&mut p.usb);
            }
        } else if PUMP_SIGNAL.take() {
            p.pump.pump(&mut p.usb);
        }
    }
}

impl Service<Peripherals> for UsbBridgeService {
    fn process(&self, ctx: &mut ServiceContext<Peripherals>) {
        ctx.peripherals.usb.poll();
        self.track_device_state(ctx);

        if !self.configured.get() {
            return;
        }

        Self::receive(ctx.peripherals);
        Self::transmit(ctx.peripherals);
    }
}
