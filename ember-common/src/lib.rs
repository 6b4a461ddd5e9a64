// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bridge core for the Ember board.
//!
//! This crate supports both `no_std` (embedded) and `std` (host) environments:
//! - Default: `no_std` mode for embedded targets
//! - `std` feature: Enables `std` support for host tools and tests
//! - `defmt` feature: Logs through `defmt` and derives `defmt::Format`
//!
//! Everything here is free of hardware access. The firmware supplies the USB
//! endpoints and board hooks through the traits in [`endpoint`] and
//! [`housekeeping`].

#![cfg_attr(not(feature = "std"), no_std)]

pub mod accumulation;
pub mod debounce;
pub mod endpoint;
pub mod housekeeping;
pub mod pump;
pub mod receive;
pub mod serial_number;
pub mod service;
pub mod status;
pub mod stream;

pub use accumulation::{AccumulationBuffer, Consumer, OverflowPolicy, Producer};
pub use endpoint::{RxEndpoint, TxEndpoint};
pub use housekeeping::{Color, Housekeeping, TickClock, TickHooks};
pub use pump::{BridgePump, PumpSignal, TransmitSession};
pub use receive::ReceiveSession;
pub use serial_number::SerialNumber;
pub use status::StatusFlags;
pub use stream::{LineCoding, SerialStream, UsbSerial};

/// Capacity of the outbound accumulation buffer.
pub const ACCUMULATION_BUFFER_SIZE: usize = 2048;

/// Largest payload of a single full-speed CDC bulk packet.
pub const MAX_PACKET_SIZE: usize = 64;

/// Ticks between two watchdog reloads.
pub const WATCHDOG_RELOAD_MS: u32 = 1000;

/// Debounced hold time that requests configuration mode.
pub const CONFIG_MODE_HOLD_MS: u32 = 3000;

/// Consecutive pressed samples before a press counts.
pub const DEBOUNCE_MS: u32 = 20;

/// Baud rate reported until the application calls `begin`.
pub const DEFAULT_BAUD_RATE: u32 = 9600;
