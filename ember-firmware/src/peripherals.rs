// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Board bring-up: clocks, LED, button, watchdog, tick alarm and USB.

use crate::tick::{self, BoardHooks, LedChannel};
use crate::usb_cdc::UsbCdc;
use ember_common::{
    AccumulationBuffer, BridgePump, PumpSignal, SerialNumber, StatusFlags, TickClock, UsbSerial,
    ACCUMULATION_BUFFER_SIZE,
};
use rp2040_hal::{
    clocks::init_clocks_and_plls,
    fugit::ExtU32,
    gpio::{self, bank0::Gpio2, FunctionSioInput, PullUp},
    pac,
    pwm::Slices,
    timer::{Alarm, Timer},
    usb::UsbBus,
    watchdog::Watchdog,
    Sio,
};
use static_cell::StaticCell;
use usb_device::class_prelude::UsbBusAllocator;

/// External crystal on the Pico.
const XTAL_FREQ_HZ: u32 = 12_000_000;

/// Hardware watchdog timeout; three reload periods.
#[cfg(feature = "watchdog")]
const WATCHDOG_TIMEOUT_US: u32 = 3 * ember_common::WATCHDOG_RELOAD_MS * 1000;

/// Descriptor string used when the chip ID words sum to zero.
const DEFAULT_SERIAL_NUMBER: &str = "0001";

pub type ButtonPin = gpio::Pin<Gpio2, FunctionSioInput, PullUp>;
pub type Outbound = AccumulationBuffer<ACCUMULATION_BUFFER_SIZE>;

pub static CLOCK: TickClock = TickClock::new();
pub static STATUS: StatusFlags = StatusFlags::new();
pub static PUMP_SIGNAL: PumpSignal = PumpSignal::new();

static OUTBOUND: StaticCell<Outbound> = StaticCell::new();
static USB_BUS: StaticCell<UsbBusAllocator<UsbBus>> = StaticCell::new();
static SERIAL_NUMBER: StaticCell<SerialNumber> = StaticCell::new();

#[derive(Debug, defmt::Format)]
pub enum BoardError {
    PeripheralsTaken,
    ClockInit,
    AlarmUnavailable,
    Usb(crate::usb_cdc::TransportError),
}

/// Main-loop resources handed to every service.
pub struct Peripherals {
    pub usb: UsbCdc,
    pub serial: UsbSerial<'static, ACCUMULATION_BUFFER_SIZE>,
    pub pump: BridgePump<'static, ACCUMULATION_BUFFER_SIZE>,
}

/// Bring the board up. The housekeeping tick is running when this returns.
pub fn init() -> Result<Peripherals, BoardError> {
    let mut pac = pac::Peripherals::take().ok_or(BoardError::PeripheralsTaken)?;

    if pac.WATCHDOG.reason().read().timer().bit_is_set() {
        defmt::warn!("Resumed from watchdog reset");
    }

    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let clocks = init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .map_err(|_| BoardError::ClockInit)?;

    let sio = Sio::new(pac.SIO);
    let pins = gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let led = init_led(pac.PWM, &mut pac.RESETS, pins.gpio25);
    let button: ButtonPin = pins.gpio2.into_pull_up_input();

    let serial_number = read_serial_number(&pac.SYSINFO);

    let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let mut alarm = timer.alarm_0().ok_or(BoardError::AlarmUnavailable)?;
    alarm.schedule(tick::TICK_PERIOD_US.micros()).ok();
    alarm.enable_interrupt();

    #[cfg(feature = "watchdog")]
    {
        watchdog.pause_on_debug(true);
        watchdog.start(WATCHDOG_TIMEOUT_US.micros());
        defmt::println!("Watchdog armed, timeout {} ms", WATCHDOG_TIMEOUT_US / 1000);
    }

    let hooks = BoardHooks::new(led, button, watchdog);
    tick::start(alarm, hooks);

    let usb_bus = USB_BUS.init(UsbBusAllocator::new(UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    )));
    let usb = UsbCdc::new(usb_bus, serial_number).map_err(BoardError::Usb)?;

    let (producer, consumer) = OUTBOUND.init(Outbound::new()).split();

    Ok(Peripherals {
        usb,
        serial: UsbSerial::new(producer, &PUMP_SIGNAL),
        pump: BridgePump::new(consumer),
    })
}

fn init_led(
    pwm: pac::PWM,
    resets: &mut pac::RESETS,
    pin: gpio::Pin<gpio::bank0::Gpio25, gpio::FunctionNull, gpio::PullDown>,
) -> LedChannel {
    let mut slices = Slices::new(pwm, resets);
    slices.pwm4.set_ph_correct();
    slices.pwm4.enable();

    let mut channel = slices.pwm4.channel_b;
    channel.output_to(pin);
    channel
}

/// The RP2040 has no factory UID in the chip itself; the SYSINFO words
/// identify the silicon revision and the die's platform.
fn read_serial_number(sysinfo: &pac::SYSINFO) -> &'static str {
    let ids = [
        sysinfo.chip_id().read().bits(),
        sysinfo.platform().read().bits(),
        sysinfo.gitref_rp2040().read().bits(),
    ];

    match SerialNumber::from_ids(ids) {
        Some(serial_number) => {
            let serial_number: &'static SerialNumber = SERIAL_NUMBER.init(serial_number);
            defmt::println!("USB serial number: {}", serial_number.as_str());
            serial_number.as_str()
        }
        None => DEFAULT_SERIAL_NUMBER,
    }
}
