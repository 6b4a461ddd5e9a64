// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! The 1 kHz housekeeping tick: millisecond clock, busy-wait delay, LED
//! animation, long-press detection and watchdog service.
//!
//! [`Housekeeping::tick`] runs in interrupt context. It never blocks and
//! every branch finishes in constant time.

use crate::debounce::Debouncer;
use crate::status::StatusFlags;
use crate::{CONFIG_MODE_HOLD_MS, WATCHDOG_RELOAD_MS};
use core::sync::atomic::{AtomicU32, Ordering};

/// LED countdown after a fade step while the host has acknowledged us.
const FADE_STEP_ACKED_MS: u32 = 20;
const FADE_STEP_MS: u32 = 1;
const BLINK_CONNECTED_MS: u32 = 50;
const BLINK_MS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Red,
    Cyan,
    White,
}

/// Board actions the tick drives. Implemented by the firmware on top of the
/// real pins and by test doubles on the host.
pub trait TickHooks {
    /// Called every tick while [`StatusFlags::led_override`] is set.
    fn led_signaling_override(&mut self) {}

    /// Advance the fade animation by one step.
    fn led_fade(&mut self);

    fn led_steady(&mut self, color: Color);

    fn led_toggle(&mut self);

    /// Raw button level, `true` while pressed.
    fn button_pressed(&mut self) -> bool;

    fn reload_watchdog(&mut self);

    /// Timing hook of the networking layer. Opaque to the tick.
    fn network_tick(&mut self) {}
}

/// Counters other contexts read: uptime and the busy-wait delay.
pub struct TickClock {
    millis: AtomicU32,
    delay: AtomicU32,
}

impl TickClock {
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
            delay: AtomicU32::new(0),
        }
    }

    /// Milliseconds since boot, wrapping.
    pub fn millis(&self) -> u32 {
        self.millis.load(Ordering::Acquire)
    }

    pub fn start_delay(&self, ms: u32) {
        self.delay.store(ms, Ordering::Release);
    }

    pub fn delay_pending(&self) -> bool {
        self.delay.load(Ordering::Acquire) != 0
    }

    /// Spin until `ms` ticks have elapsed, calling `idle` between checks.
    /// Must not be called from the tick interrupt itself.
    pub fn delay_ms(&self, ms: u32, mut idle: impl FnMut()) {
        self.start_delay(ms);
        while self.delay_pending() {
            idle();
        }
    }

    fn advance(&self) {
        let millis = self.millis.load(Ordering::Relaxed);
        self.millis.store(millis.wrapping_add(1), Ordering::Release);

        let delay = self.delay.load(Ordering::Relaxed);
        if delay != 0 {
            self.delay.store(delay - 1, Ordering::Release);
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick-owned timing state.
pub struct Housekeeping<'a> {
    clock: &'a TickClock,
    flags: &'a StatusFlags,
    led_countdown: u32,
    button: Debouncer,
    watchdog_reload: u32,
}

impl<'a> Housekeeping<'a> {
    pub const fn new(clock: &'a TickClock, flags: &'a StatusFlags) -> Self {
        Self {
            clock,
            flags,
            led_countdown: 0,
            button: Debouncer::new(),
            watchdog_reload: 0,
        }
    }

    /// One millisecond of housekeeping.
    pub fn tick<H: TickHooks>(&mut self, hooks: &mut H) {
        self.clock.advance();
        self.animate_led(hooks);
        self.check_button(hooks);
        self.service_watchdog(hooks);
        hooks.network_tick();
    }

    fn animate_led<H: TickHooks>(&mut self, hooks: &mut H) {
        let flags = self.flags;

        if flags.led_override() {
            hooks.led_signaling_override();
        } else if self.led_countdown != 0 {
            self.led_countdown -= 1;
        } else if flags.led_held() {
            // config mode, flash update or error pattern owns the LED
        } else if flags.led_fade() {
            hooks.led_fade();
            self.led_countdown = if flags.device_acked() {
                FADE_STEP_ACKED_MS
            } else {
                FADE_STEP_MS
            };
        } else if flags.device_acked() {
            hooks.led_steady(Color::Cyan);
            flags.set_led_fade(true);
        } else {
            hooks.led_toggle();
            self.led_countdown = if flags.socket_connected() {
                BLINK_CONNECTED_MS
            } else {
                BLINK_MS
            };
        }
    }

    fn check_button<H: TickHooks>(&mut self, hooks: &mut H) {
        self.button.sample(hooks.button_pressed());

        if self.button.held_ms() >= CONFIG_MODE_HOLD_MS {
            self.button.reset();
            self.flags.set_config_mode(true);

            #[cfg(feature = "defmt")]
            defmt::println!("Button held {} ms, entering config mode", CONFIG_MODE_HOLD_MS);
        }
    }

    fn service_watchdog<H: TickHooks>(&mut self, hooks: &mut H) {
        self.watchdog_reload += 1;
        if self.watchdog_reload >= WATCHDOG_RELOAD_MS {
            self.watchdog_reload = 0;
            hooks.reload_watchdog();
        }
    }

    pub fn clock(&self) -> &'a TickClock {
        self.clock
    }

    pub fn led_countdown(&self) -> u32 {
        self.led_countdown
    }

    pub fn watchdog_reload_count(&self) -> u32 {
        self.watchdog_reload
    }

    pub fn button(&self) -> &Debouncer {
        &self.button
    }
}
