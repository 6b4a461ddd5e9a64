// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Tests for the USB serial-number encoder.

use ember_common::serial_number::int_to_unicode;
use ember_common::SerialNumber;

#[test]
fn test_serial_number_digits() {
    let sn = SerialNumber::from_ids([0x1234_5678, 0xABCD_0000, 0x1111_1111]).unwrap();

    assert_eq!(sn.as_str(), "23456789ABCD");
}

#[test]
fn test_serial_number_descriptor_is_utf16le() {
    let sn = SerialNumber::from_ids([0x0000_00FF, 0x1000_0000, 0]).unwrap();
    let descriptor = sn.utf16_descriptor();

    assert_eq!(descriptor.len(), 24);
    assert_eq!(&descriptor[..4], &[b'0', 0, b'0', 0]);
    assert_eq!(&descriptor[12..16], &[b'F', 0, b'F', 0]);
    assert_eq!(&descriptor[16..24], &[b'1', 0, b'0', 0, b'0', 0, b'0', 0]);
}

#[test]
fn test_serial_number_zero_sum_is_rejected() {
    assert_eq!(SerialNumber::from_ids([1, 0xDEAD_BEEF, u32::MAX]), None);
    assert_eq!(SerialNumber::from_ids([0, 0xDEAD_BEEF, 0]), None);
}

#[test]
fn test_int_to_unicode_takes_top_nibbles() {
    let mut out = [0xFFu8; 4];
    int_to_unicode(0xDEAD_BEEF, &mut out);

    assert_eq!(out, [b'D', 0, b'E', 0]);
}

#[test]
fn test_int_to_unicode_full_word() {
    let mut out = [0u8; 16];
    int_to_unicode(0x09AF_0000, &mut out);

    let digits: Vec<u8> = out.iter().step_by(2).copied().collect();
    assert_eq!(digits, b"09AF0000");
    assert!(out.iter().skip(1).step_by(2).all(|&b| b == 0));
}
