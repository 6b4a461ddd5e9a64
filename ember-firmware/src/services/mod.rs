// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Service implementations for the firmware main loop.

pub mod bridge;
pub mod config_mode;
pub mod echo;

pub use bridge::UsbBridgeService;
pub use config_mode::ConfigModeService;
pub use echo::EchoService;
