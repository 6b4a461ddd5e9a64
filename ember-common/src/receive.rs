// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Inbound side of the bridge: hands the bytes of the current USB OUT packet
//! to the application one at a time.

use crate::endpoint::RxEndpoint;
use crate::MAX_PACKET_SIZE;

/// Consumption state of the current inbound packet.
pub struct ReceiveSession<const P: usize = MAX_PACKET_SIZE> {
    buffer: [u8; P],
    length: usize,
    cursor: usize,
    active: bool,
    configured: bool,
}

impl<const P: usize> ReceiveSession<P> {
    pub const fn new() -> Self {
        Self {
            buffer: [0; P],
            length: 0,
            cursor: 0,
            active: false,
            configured: false,
        }
    }

    /// Track the USB device state. Leaving the configured state drops
    /// whatever is left of the current packet.
    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
        if !configured {
            self.clear();
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Accept a packet from the OUT endpoint.
    ///
    /// Returns the number of bytes taken, at most `P`. Nothing is taken while
    /// the previous packet is still being read or when `packet` is empty.
    pub fn deliver(&mut self, packet: &[u8]) -> usize {
        if self.active || packet.is_empty() {
            return 0;
        }

        let length = packet.len().min(P);
        self.buffer[..length].copy_from_slice(&packet[..length]);
        self.length = length;
        self.cursor = 0;
        self.active = true;
        length
    }

    pub fn available(&self) -> usize {
        if self.configured && self.active {
            self.length - self.cursor
        } else {
            0
        }
    }

    /// Next unread byte, or `None` when nothing is available.
    ///
    /// Taking the last byte of the packet deactivates the session and
    /// re-arms `endpoint` for the next one.
    pub fn receive_byte<E: RxEndpoint>(&mut self, endpoint: &mut E) -> Option<u8> {
        if self.available() == 0 {
            return None;
        }

        let byte = self.buffer[self.cursor];
        self.cursor += 1;

        if self.cursor == self.length {
            self.active = false;
            endpoint.arm();
        }

        Some(byte)
    }

    pub fn peek(&self) -> Option<u8> {
        (self.available() > 0).then(|| self.buffer[self.cursor])
    }

    /// Drop the current packet without reading it.
    pub fn clear(&mut self) {
        self.length = 0;
        self.cursor = 0;
        self.active = false;
    }
}

impl<const P: usize> Default for ReceiveSession<P> {
    fn default() -> Self {
        Self::new()
    }
}
