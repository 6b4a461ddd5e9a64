// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Seams between the bridge core and the USB device stack.

/// The bulk IN endpoint the bridge pump transmits through.
pub trait TxEndpoint {
    /// Packet buffer of the endpoint. Its length is the largest payload a
    /// single transfer may carry.
    fn buffer(&mut self) -> &mut [u8];

    /// Set the byte count to `len` and hand the first `len` bytes of
    /// [`buffer`](Self::buffer) to the hardware.
    fn arm(&mut self, len: usize);
}

/// The bulk OUT endpoint the receive session reads from.
pub trait RxEndpoint {
    /// Allow the host to deliver the next packet.
    fn arm(&mut self);
}

/// Receive-side arming state for stacks that are polled rather than armed
/// in hardware: the poll loop only fetches a packet while the gate is open.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxGate {
    armed: bool,
}

impl RxGate {
    pub const fn new() -> Self {
        Self { armed: true }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Default for RxGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RxEndpoint for RxGate {
    fn arm(&mut self) {
        self.armed = true;
    }
}
