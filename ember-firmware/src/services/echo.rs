// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Application loop: echoes every byte from the host back to it.

use crate::peripherals::Peripherals;
use core::cell::Cell;
use ember_common::service::{Event, Service, ServiceContext};
use ember_common::SerialStream;

/// Echo application, paused while configuration mode is active
pub struct EchoService {
    paused: Cell<bool>,
}

impl EchoService {
    pub fn new() -> Self {
        Self {
            paused: Cell::new(false),
        }
    }

    fn handle_events(&self, ctx: &mut ServiceContext<Peripherals>) {
        let p = &mut *ctx.peripherals;

        if ctx.events.take(Event::UsbConfigured) {
            p.serial.begin(p.usb.host_baud_rate());
        }
        if ctx.events.take(Event::UsbDisconnected) {
            p.serial.end();
        }
        if ctx.events.take(Event::EnterConfigMode) {
            self.paused.set(true);
        }
        if ctx.events.take(Event::LeaveConfigMode) {
            self.paused.set(false);
        }
    }
}

impl Service<Peripherals> for EchoService {
    fn process(&self, ctx: &mut ServiceContext<Peripherals>) {
        self.handle_events(ctx);

        if self.paused.get() {
            return;
        }

        let serial = &mut ctx.peripherals.serial;
        while let Some(byte) = serial.read() {
            serial.write(byte);
        }

        let overruns = serial.overruns();
        if overruns != 0 {
            defmt::trace!("Echo: {} overruns so far", overruns);
        }
    }
}
