// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

#![no_std]
#![no_main]

mod peripherals;
mod services;
mod tick;
mod usb_cdc;

use defmt_rtt as _;
use panic_probe as _;

defmt::timestamp!("{=u32:ms}", { peripherals::CLOCK.millis() });

use cortex_m_rt::entry;
use ember_common::service::{EventBus, Service, ServiceContext};
use services::{ConfigModeService, EchoService, UsbBridgeService};

#[unsafe(link_section = ".boot2")]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

#[entry]
fn main() -> ! {
    defmt::println!("Ember init");

    let mut board = match peripherals::init() {
        Ok(board) => board,
        Err(e) => defmt::panic!("Board init failed: {:?}", e),
    };

    let bridge = UsbBridgeService::new();
    let config_mode = ConfigModeService::new();
    let echo = EchoService::new();
    let services: [&dyn Service<peripherals::Peripherals>; 3] = [&bridge, &config_mode, &echo];

    let events = EventBus::new();

    defmt::println!("Entering main loop");
    loop {
        let mut ctx = ServiceContext {
            peripherals: &mut board,
            events: &events,
        };
        for service in services {
            service.process(&mut ctx);
        }
    }
}
