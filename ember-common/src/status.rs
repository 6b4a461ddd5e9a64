// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! System status flags shared between the housekeeping tick and the rest of
//! the firmware.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

macro_rules! status_flag {
    ($(#[$doc:meta])* $field:ident, $setter:ident) => {
        $(#[$doc])*
        pub fn $field(&self) -> bool {
            self.$field.load(Ordering::Acquire)
        }

        pub fn $setter(&self, value: bool) {
            self.$field.store(value, Ordering::Release);
        }
    };
}

/// Plain status flags. Every flag is a single atomic so it can be read or
/// written from the tick interrupt and the main loop alike.
pub struct StatusFlags {
    led_override: AtomicBool,
    led_fade: AtomicBool,
    device_acked: AtomicBool,
    socket_connected: AtomicBool,
    config_mode: AtomicBool,
    flash_update: AtomicBool,
    error_count: AtomicU8,
}

impl StatusFlags {
    pub const fn new() -> Self {
        Self {
            led_override: AtomicBool::new(false),
            led_fade: AtomicBool::new(false),
            device_acked: AtomicBool::new(false),
            socket_connected: AtomicBool::new(false),
            config_mode: AtomicBool::new(false),
            flash_update: AtomicBool::new(false),
            error_count: AtomicU8::new(0),
        }
    }

    status_flag!(
        /// Someone else drives the LED; the tick only calls the override hook.
        led_override,
        set_led_override
    );
    status_flag!(led_fade, set_led_fade);
    status_flag!(
        /// The host acknowledged the device.
        device_acked,
        set_device_acked
    );
    status_flag!(socket_connected, set_socket_connected);
    status_flag!(
        /// Set by a long button press.
        config_mode,
        set_config_mode
    );
    status_flag!(flash_update, set_flash_update);

    pub fn error_count(&self) -> u8 {
        self.error_count.load(Ordering::Acquire)
    }

    pub fn set_error_count(&self, count: u8) {
        self.error_count.store(count, Ordering::Release);
    }

    /// The LED is held by a higher-priority state and must not animate.
    pub fn led_held(&self) -> bool {
        self.config_mode() || self.flash_update() || self.error_count() > 0
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::new()
    }
}
