// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Button debouncing on the 1 kHz tick.

use crate::DEBOUNCE_MS;

/// Tracks how long the button has been held, one sample per millisecond.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    pressed_ms: u32,
    /// Set by `reset`; hold time stops accruing until the button is released.
    latched: bool,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            pressed_ms: 0,
            latched: false,
        }
    }

    pub fn sample(&mut self, pressed: bool) {
        if !pressed {
            self.pressed_ms = 0;
            self.latched = false;
        } else if !self.latched {
            self.pressed_ms = self.pressed_ms.saturating_add(1);
        }
    }

    /// Debounced hold time in milliseconds, 0 until the press is stable.
    pub fn held_ms(&self) -> u32 {
        if self.pressed_ms >= DEBOUNCE_MS {
            self.pressed_ms
        } else {
            0
        }
    }

    pub fn reset(&mut self) {
        self.pressed_ms = 0;
        self.latched = true;
    }
}
