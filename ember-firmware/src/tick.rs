// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! 1 kHz housekeeping interrupt and the board side of its hooks.

use crate::peripherals::{ButtonPin, CLOCK, STATUS};
use core::cell::RefCell;
use cortex_m::peripheral::NVIC;
use critical_section::Mutex;
use ember_common::{Color, Housekeeping, TickHooks};
use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use rp2040_hal::{
    fugit::ExtU32,
    pac::{self, interrupt},
    pwm,
    timer::{Alarm, Alarm0},
    watchdog::Watchdog,
};

pub const TICK_PERIOD_US: u32 = 1000;

/// Brightness change per fade step, in percent.
const FADE_STEP_PERCENT: u8 = 4;

/// Override pattern half-period in ticks.
const OVERRIDE_BLINK_MS: u16 = 150;

pub type LedChannel = pwm::Channel<pwm::Slice<pwm::Pwm4, pwm::FreeRunning>, pwm::B>;

struct TickContext {
    alarm: Alarm0,
    housekeeping: Housekeeping<'static>,
    hooks: BoardHooks,
}

static TICK: Mutex<RefCell<Option<TickContext>>> = Mutex::new(RefCell::new(None));

/// Move the alarm and hooks into the interrupt and unmask it.
pub fn start(alarm: Alarm0, hooks: BoardHooks) {
    critical_section::with(|cs| {
        TICK.borrow_ref_mut(cs).replace(TickContext {
            alarm,
            housekeeping: Housekeeping::new(&CLOCK, &STATUS),
            hooks,
        });
    });

    // SAFETY: TICK is populated, the handler has everything it needs
    unsafe { NVIC::unmask(pac::Interrupt::TIMER_IRQ_0) };
}

#[interrupt]
fn TIMER_IRQ_0() {
    critical_section::with(|cs| {
        if let Some(ctx) = TICK.borrow_ref_mut(cs).as_mut() {
            ctx.alarm.clear_interrupt();
            ctx.alarm.schedule(TICK_PERIOD_US.micros()).ok();
            ctx.housekeeping.tick(&mut ctx.hooks);
        }
    });
}

/// Status LED on PWM, active-low button and the watchdog.
pub struct BoardHooks {
    led: LedChannel,
    led_on: bool,
    brightness: u8,
    rising: bool,
    override_phase: u16,
    button: ButtonPin,
    #[cfg_attr(not(feature = "watchdog"), allow(dead_code))]
    watchdog: Watchdog,
}

impl BoardHooks {
    pub fn new(led: LedChannel, button: ButtonPin, watchdog: Watchdog) -> Self {
        Self {
            led,
            led_on: false,
            brightness: 0,
            rising: true,
            override_phase: 0,
            button,
            watchdog,
        }
    }

    fn set_led(&mut self, on: bool) {
        self.led_on = on;
        if on {
            self.led.set_duty_cycle_fully_on().ok();
        } else {
            self.led.set_duty_cycle_fully_off().ok();
        }
    }
}

impl TickHooks for BoardHooks {
    /// Fast blink while configuration mode owns the LED.
    fn led_signaling_override(&mut self) {
        self.override_phase += 1;
        if self.override_phase >= OVERRIDE_BLINK_MS {
            self.override_phase = 0;
            self.set_led(!self.led_on);
        }
    }

    fn led_fade(&mut self) {
        if self.rising {
            self.brightness = (self.brightness + FADE_STEP_PERCENT).min(100);
            self.rising = self.brightness < 100;
        } else {
            self.brightness = self.brightness.saturating_sub(FADE_STEP_PERCENT);
            self.rising = self.brightness == 0;
        }
        self.led.set_duty_cycle_percent(self.brightness).ok();
    }

    fn led_steady(&mut self, color: Color) {
        // single-colour LED: any colour is "on"
        defmt::trace!("LED steady {:?}", color);
        self.brightness = 100;
        self.rising = false;
        self.set_led(true);
    }

    fn led_toggle(&mut self) {
        self.set_led(!self.led_on);
    }

    fn button_pressed(&mut self) -> bool {
        self.button.is_low().unwrap_or(false)
    }

    fn reload_watchdog(&mut self) {
        #[cfg(feature = "watchdog")]
        self.watchdog.feed();
    }
}
