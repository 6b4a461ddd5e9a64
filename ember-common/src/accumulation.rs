// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Fixed-capacity circular buffer for outbound serial data.
//!
//! The buffer has exactly one producer and one consumer, obtained together
//! from [`AccumulationBuffer::split`]. The producer owns `write_index`, the
//! consumer owns `read_index`; neither half ever stores to the other's cursor,
//! so the pair is safe across interrupt and task contexts without a lock.
//!
//! Only atomic loads and stores are used (no read-modify-write), which keeps
//! the type usable on ARMv6-M.

use core::sync::atomic::{AtomicU32, AtomicU8, AtomicUsize, Ordering};

/// What happens to unread bytes when the producer outruns the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// The producer keeps writing. Once `write_index` lands on `read_index`
    /// the unread region looks empty to the consumer and is lost.
    DropUnread,
}

/// Outbound byte buffer shared by a [`Producer`] and a [`Consumer`].
pub struct AccumulationBuffer<const N: usize> {
    data: [AtomicU8; N],
    write_index: AtomicUsize,
    /// May transiently hold `N` after a consumer advance; see
    /// [`Consumer::normalize`].
    read_index: AtomicUsize,
    overruns: AtomicU32,
}

impl<const N: usize> AccumulationBuffer<N> {
    /// Overflow behaviour of every accumulation buffer.
    pub const POLICY: OverflowPolicy = OverflowPolicy::DropUnread;

    pub const fn new() -> Self {
        assert!(N > 0, "accumulation buffer needs a nonzero capacity");
        Self {
            data: [const { AtomicU8::new(0) }; N],
            write_index: AtomicUsize::new(0),
            read_index: AtomicUsize::new(0),
            overruns: AtomicU32::new(0),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Hand out the two halves. Requiring `&mut self` means there is never
    /// more than one live pair per buffer.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let buf = &*self;
        (Producer { buf }, Consumer { buf })
    }

    fn read_position(&self) -> usize {
        match self.read_index.load(Ordering::Acquire) {
            r if r == N => 0,
            r => r,
        }
    }

    fn len(&self) -> usize {
        let w = self.write_index.load(Ordering::Acquire);
        let r = self.read_position();
        (w + N - r) % N
    }
}

impl<const N: usize> Default for AccumulationBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half. Owns `write_index`.
pub struct Producer<'a, const N: usize> {
    buf: &'a AccumulationBuffer<N>,
}

impl<const N: usize> Producer<'_, N> {
    /// Store `byte` and advance the write cursor. Never blocks and never
    /// refuses; see [`OverflowPolicy::DropUnread`].
    pub fn append(&mut self, byte: u8) {
        let w = self.buf.write_index.load(Ordering::Relaxed);
        self.buf.data[w].store(byte, Ordering::Relaxed);

        let next = if w + 1 == N { 0 } else { w + 1 };
        self.buf.write_index.store(next, Ordering::Release);

        if next == self.buf.read_position() {
            let overruns = self.buf.overruns.load(Ordering::Relaxed);
            self.buf
                .overruns
                .store(overruns.wrapping_add(1), Ordering::Relaxed);
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.append(byte);
        }
    }

    /// Times the producer lapped the consumer and dropped unread data.
    pub fn overruns(&self) -> u32 {
        self.buf.overruns.load(Ordering::Relaxed)
    }

    pub fn write_index(&self) -> usize {
        self.buf.write_index.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Read half. Owns `read_index`; driven by the bridge pump.
pub struct Consumer<'a, const N: usize> {
    buf: &'a AccumulationBuffer<N>,
}

impl<const N: usize> Consumer<'_, N> {
    /// Wrap a read cursor left at `N` by the previous [`advance`](Self::advance).
    pub fn normalize(&mut self) {
        if self.buf.read_index.load(Ordering::Relaxed) == N {
            self.buf.read_index.store(0, Ordering::Release);
        }
    }

    /// Number of unread bytes that sit next to each other in memory starting
    /// at the read cursor. Stops at the physical end of the array when the
    /// unread region wraps.
    pub fn contiguous_run(&self) -> usize {
        let r = self.buf.read_position();
        let w = self.buf.write_index.load(Ordering::Acquire);
        if r > w {
            N - r
        } else {
            w - r
        }
    }

    /// Copy the head of the contiguous run into `out` without consuming it.
    /// Returns how many bytes were copied: the run clamped to `out.len()`.
    pub fn copy_run(&self, out: &mut [u8]) -> usize {
        let start = self.buf.read_position();
        let count = self.contiguous_run().min(out.len());
        for (dst, src) in out[..count].iter_mut().zip(&self.buf.data[start..start + count]) {
            *dst = src.load(Ordering::Relaxed);
        }
        count
    }

    /// Release `count` bytes. The cursor is left at `N` rather than wrapped
    /// when the run ended at the physical end of the array.
    pub fn advance(&mut self, count: usize) {
        let r = self.buf.read_position();
        debug_assert!(r + count <= N);
        self.buf.read_index.store(r + count, Ordering::Release);
    }

    pub fn read_index(&self) -> usize {
        self.buf.read_index.load(Ordering::Relaxed)
    }

    pub fn write_index(&self) -> usize {
        self.buf.write_index.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.read_position() == self.buf.write_index.load(Ordering::Acquire)
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
