// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Serial port access to the device.

use std::io::{self, Read, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use serialport::SerialPort;

/// Read timeout; short so the tools stay responsive.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

pub struct Transport {
    port: Box<dyn SerialPort>,
}

impl Transport {
    /// Open `port` and assert DTR so the device sees a terminal attached.
    pub fn new(port: &str, baud_rate: u32) -> Result<Self> {
        let mut port = serialport::new(port, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("Failed to open {}", port))?;

        port.write_data_terminal_ready(true)
            .context("Failed to assert DTR")?;

        Ok(Self { port })
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data).context("Write to device failed")?;
        self.port.flush().context("Flush to device failed")
    }

    /// Read whatever arrived within the timeout. `Ok(0)` on timeout.
    pub fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e).context("Read from device failed"),
        }
    }
}
