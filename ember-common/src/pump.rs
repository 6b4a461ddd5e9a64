// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bridge pump: drains the accumulation buffer into the USB IN endpoint, one
//! packet per cycle.

use crate::accumulation::Consumer;
use crate::endpoint::TxEndpoint;
use core::sync::atomic::{AtomicBool, Ordering};

/// In-flight state of the current USB transmit transaction.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitSession {
    busy: bool,
}

impl TransmitSession {
    pub const fn new() -> Self {
        Self { busy: false }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn start(&mut self) {
        self.busy = true;
    }

    fn finish(&mut self) {
        self.busy = false;
    }
}

/// "Pump requested" notification raised from any context and consumed by the
/// single reactor that owns the [`BridgePump`].
pub struct PumpSignal {
    requested: AtomicBool,
}

impl PumpSignal {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Raise the signal. Callers append their data first.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Clear the signal and report whether it was raised.
    ///
    /// This is a load followed by a store (ARMv6-M has no atomic swap), so a
    /// `request` landing between the two is lost. Call `request` from the
    /// same context as `take`, or re-raise it from a later event.
    pub fn take(&self) -> bool {
        if self.requested.load(Ordering::Acquire) {
            self.requested.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl Default for PumpSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of the consumer half of the accumulation buffer and the transmit
/// session.
pub struct BridgePump<'a, const N: usize> {
    consumer: Consumer<'a, N>,
    session: TransmitSession,
    packets_sent: u32,
    bytes_sent: u32,
}

impl<'a, const N: usize> BridgePump<'a, N> {
    pub fn new(consumer: Consumer<'a, N>) -> Self {
        Self {
            consumer,
            session: TransmitSession::new(),
            packets_sent: 0,
            bytes_sent: 0,
        }
    }

    /// Move at most one packet from the buffer to `endpoint`.
    ///
    /// A no-op while a transfer is in flight or when nothing is buffered.
    pub fn pump<E: TxEndpoint>(&mut self, endpoint: &mut E) {
        if self.session.is_busy() {
            return;
        }

        self.consumer.normalize();

        if self.consumer.is_empty() {
            self.session.finish();
            return;
        }

        let sent = self.consumer.copy_run(endpoint.buffer());
        if sent == 0 {
            // zero-sized endpoint buffer; nothing can be framed
            return;
        }
        self.consumer.advance(sent);

        self.session.start();
        endpoint.arm(sent);

        self.packets_sent = self.packets_sent.wrapping_add(1);
        self.bytes_sent = self.bytes_sent.wrapping_add(sent as u32);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Bridge: sent {} bytes, read_index={}, pending={}",
            sent,
            self.consumer.read_index(),
            self.consumer.len()
        );
    }

    /// Transmit-complete callback: clear the session and start the next
    /// packet if one is waiting.
    pub fn on_transmit_complete<E: TxEndpoint>(&mut self, endpoint: &mut E) {
        self.session.finish();
        self.pump(endpoint);
    }

    /// Forget a transfer the device can no longer complete, e.g. after the
    /// host went away. Buffered data stays queued for the next pump.
    pub fn reset_session(&mut self) {
        self.session.finish();
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    pub fn session(&self) -> &TransmitSession {
        &self.session
    }

    pub fn consumer(&self) -> &Consumer<'a, N> {
        &self.consumer
    }

    pub fn packets_sent(&self) -> u32 {
        self.packets_sent
    }

    pub fn bytes_sent(&self) -> u32 {
        self.bytes_sent
    }
}
