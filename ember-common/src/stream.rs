// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Byte-stream view of the bridge for application code.

use crate::accumulation::Producer;
use crate::endpoint::RxGate;
use crate::pump::PumpSignal;
use crate::receive::ReceiveSession;
use crate::{DEFAULT_BAUD_RATE, MAX_PACKET_SIZE};

/// Serial parameters requested by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineCoding {
    pub baud_rate: u32,
    pub data_bits: u8,
}

impl Default for LineCoding {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: 8,
        }
    }
}

/// Non-blocking serial stream.
pub trait SerialStream {
    fn begin(&mut self, baud_rate: u32);

    fn end(&mut self);

    /// Bytes that [`read`](Self::read) can return right now.
    fn available(&self) -> usize;

    /// Next byte, `None` when there is no data. Never blocks.
    fn read(&mut self) -> Option<u8>;

    fn peek(&self) -> Option<u8>;

    /// Ask for buffered output to be sent. Returns without waiting.
    fn flush(&mut self);

    /// Queue one byte. Returns the number of bytes accepted.
    fn write(&mut self, byte: u8) -> usize;

    fn is_ready(&self) -> bool;

    fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().map(|&byte| self.write(byte)).sum()
    }
}

/// The USB virtual serial port: inbound bytes from the current OUT packet,
/// outbound bytes into the accumulation buffer.
pub struct UsbSerial<'a, const N: usize, const P: usize = MAX_PACKET_SIZE> {
    rx: ReceiveSession<P>,
    gate: RxGate,
    tx: Producer<'a, N>,
    signal: &'a PumpSignal,
    line_coding: LineCoding,
}

impl<'a, const N: usize, const P: usize> UsbSerial<'a, N, P> {
    pub fn new(tx: Producer<'a, N>, signal: &'a PumpSignal) -> Self {
        Self {
            rx: ReceiveSession::new(),
            gate: RxGate::new(),
            tx,
            signal,
            line_coding: LineCoding::default(),
        }
    }

    /// Track the USB device state. Output left queued across a disconnect
    /// is re-announced to the pump once the device is configured again.
    pub fn set_configured(&mut self, configured: bool) {
        self.rx.set_configured(configured);
        if !configured {
            self.gate = RxGate::new();
        } else if !self.tx.is_empty() {
            self.signal.request();
        }
    }

    /// The poll loop should fetch the next OUT packet.
    pub fn wants_packet(&self) -> bool {
        self.rx.is_configured() && self.gate.is_armed()
    }

    /// Hand an OUT packet to the receive session. Closes the gate until the
    /// packet has been read out.
    pub fn deliver(&mut self, packet: &[u8]) -> usize {
        let taken = self.rx.deliver(packet);
        if taken > 0 {
            self.gate.disarm();
        }
        taken
    }

    pub fn line_coding(&self) -> LineCoding {
        self.line_coding
    }

    pub fn overruns(&self) -> u32 {
        self.tx.overruns()
    }

    /// Outbound bytes not yet taken by the pump.
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

impl<const N: usize, const P: usize> SerialStream for UsbSerial<'_, N, P> {
    fn begin(&mut self, baud_rate: u32) {
        self.line_coding.baud_rate = baud_rate;

        #[cfg(feature = "defmt")]
        defmt::println!("Serial: begin at {} baud", baud_rate);
    }

    fn end(&mut self) {
        self.rx.clear();
        self.gate = RxGate::new();
        self.line_coding = LineCoding::default();
    }

    fn available(&self) -> usize {
        self.rx.available()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.receive_byte(&mut self.gate)
    }

    fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    fn flush(&mut self) {
        self.signal.request();
    }

    fn write(&mut self, byte: u8) -> usize {
        if !self.rx.is_configured() {
            return 0;
        }
        self.tx.append(byte);
        self.signal.request();
        1
    }

    fn is_ready(&self) -> bool {
        self.rx.is_configured()
    }
}

impl<const N: usize, const P: usize> core::fmt::Write for UsbSerial<'_, N, P> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}
