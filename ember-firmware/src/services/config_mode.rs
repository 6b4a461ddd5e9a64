// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Configuration mode entered by a long button press.

use crate::peripherals::{Peripherals, CLOCK, STATUS};
use core::cell::Cell;
use ember_common::service::{Event, Service, ServiceContext};

/// How long configuration mode lasts once entered.
const CONFIG_MODE_WINDOW_MS: u32 = 10_000;

/// Announces configuration mode and ends it after a fixed window
pub struct ConfigModeService {
    entered_at: Cell<Option<u32>>,
}

impl ConfigModeService {
    pub fn new() -> Self {
        Self {
            entered_at: Cell::new(None),
        }
    }
}

impl Service<Peripherals> for ConfigModeService {
    fn process(&self, ctx: &mut ServiceContext<Peripherals>) {
        let now = CLOCK.millis();

        match (self.entered_at.get(), STATUS.config_mode()) {
            (None, true) => {
                defmt::println!("Config mode: entered");
                STATUS.set_led_override(true);
                self.entered_at.set(Some(now));
                ctx.events.publish(Event::EnterConfigMode);
            }
            (Some(since), true) if now.wrapping_sub(since) >= CONFIG_MODE_WINDOW_MS => {
                defmt::println!("Config mode: window elapsed");
                STATUS.set_config_mode(false);
                STATUS.set_led_override(false);
                self.entered_at.set(None);
                ctx.events.publish(Event::LeaveConfigMode);
            }
            _ => {}
        }
    }
}
