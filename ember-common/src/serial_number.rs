// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB serial-number string built from the chip's identification words.

/// Hex digits taken from the first (combined) word.
const HIGH_DIGITS: usize = 8;
/// Hex digits taken from the top of the second word.
const LOW_DIGITS: usize = 4;
const DIGITS: usize = HIGH_DIGITS + LOW_DIGITS;

/// Write the `out.len() / 2` most significant nibbles of `value` as
/// uppercase hex, UTF-16LE coded: each digit is followed by a zero byte.
pub fn int_to_unicode(mut value: u32, out: &mut [u8]) {
    for pair in out.chunks_exact_mut(2) {
        let nibble = (value >> 28) as u8;
        pair[0] = if nibble < 0xA {
            nibble + b'0'
        } else {
            nibble - 0xA + b'A'
        };
        pair[1] = 0;
        value <<= 4;
    }
}

/// Twelve-digit serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialNumber {
    descriptor: [u8; DIGITS * 2],
    ascii: [u8; DIGITS],
}

impl SerialNumber {
    /// Combine the three identification words. `None` when
    /// `ids[0] + ids[2]` wraps to zero; the caller keeps its default string.
    pub fn from_ids(ids: [u32; 3]) -> Option<Self> {
        let high = ids[0].wrapping_add(ids[2]);
        if high == 0 {
            return None;
        }

        let mut descriptor = [0u8; DIGITS * 2];
        let (head, tail) = descriptor.split_at_mut(HIGH_DIGITS * 2);
        int_to_unicode(high, head);
        int_to_unicode(ids[1], tail);

        let mut ascii = [0u8; DIGITS];
        for (dst, pair) in ascii.iter_mut().zip(descriptor.chunks_exact(2)) {
            *dst = pair[0];
        }

        Some(Self { descriptor, ascii })
    }

    /// UTF-16LE body of the string descriptor.
    pub fn utf16_descriptor(&self) -> &[u8; DIGITS * 2] {
        &self.descriptor
    }

    pub fn as_str(&self) -> &str {
        // only ASCII hex digits are ever written
        core::str::from_utf8(&self.ascii).unwrap_or("")
    }
}
