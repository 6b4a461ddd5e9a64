// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Tests for the USB serial stream on top of the bridge.

use core::fmt::Write as _;
use ember_common::{
    AccumulationBuffer, BridgePump, PumpSignal, SerialStream, TxEndpoint, UsbSerial,
    DEFAULT_BAUD_RATE,
};

struct MockTx {
    buf: [u8; 8],
    sent: Vec<u8>,
}

impl TxEndpoint for MockTx {
    fn buffer(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn arm(&mut self, len: usize) {
        self.sent.extend_from_slice(&self.buf[..len]);
    }
}

#[test]
fn test_write_requires_configured_device() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, _consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);

    assert!(!serial.is_ready());
    assert_eq!(serial.write(b'x'), 0);
    assert_eq!(serial.pending(), 0);
    assert!(!signal.is_requested());

    serial.set_configured(true);
    assert!(serial.is_ready());
    assert_eq!(serial.write(b'x'), 1);
    assert_eq!(serial.pending(), 1);
    assert!(signal.take());
    assert!(!signal.take());
}

#[test]
fn test_formatted_output_reaches_endpoint() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);
    let mut pump = BridgePump::new(consumer);
    let mut ep = MockTx {
        buf: [0; 8],
        sent: Vec::new(),
    };

    serial.set_configured(true);
    write!(serial, "hi {}", 42).unwrap();
    assert_eq!(serial.pending(), 5);

    while signal.take() {
        pump.pump(&mut ep);
    }
    assert_eq!(ep.sent, b"hi 42");
}

#[test]
fn test_inbound_packet_gates_next_fetch() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, _consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);

    assert!(!serial.wants_packet());
    serial.set_configured(true);
    assert!(serial.wants_packet());

    assert_eq!(serial.deliver(b"abc"), 3);
    assert!(!serial.wants_packet());
    assert_eq!(serial.available(), 3);
    assert_eq!(serial.peek(), Some(b'a'));

    assert_eq!(serial.read(), Some(b'a'));
    assert_eq!(serial.read(), Some(b'b'));
    assert!(!serial.wants_packet());
    assert_eq!(serial.read(), Some(b'c'));
    assert!(serial.wants_packet());
    assert_eq!(serial.read(), None);
}

#[test]
fn test_disconnect_rearms_receive() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, _consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);

    serial.set_configured(true);
    serial.deliver(b"ab");
    serial.set_configured(false);
    serial.set_configured(true);

    assert!(serial.wants_packet());
    assert_eq!(serial.available(), 0);
}

#[test]
fn test_begin_and_end_manage_line_coding() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, _consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);

    assert_eq!(serial.line_coding().baud_rate, DEFAULT_BAUD_RATE);
    serial.begin(115_200);
    assert_eq!(serial.line_coding().baud_rate, 115_200);

    serial.set_configured(true);
    serial.deliver(b"xyz");
    serial.end();
    assert_eq!(serial.available(), 0);
    assert!(serial.wants_packet());
    assert_eq!(serial.line_coding().baud_rate, DEFAULT_BAUD_RATE);
}

#[test]
fn test_flush_requests_pump() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, _consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);

    serial.flush();
    assert!(signal.is_requested());
}

#[test]
fn test_reconnect_resumes_queued_output() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);
    let mut pump = BridgePump::new(consumer);
    let mut ep = MockTx {
        buf: [0; 8],
        sent: Vec::new(),
    };
    let expected: Vec<u8> = (1..=12).collect();

    serial.set_configured(true);
    assert_eq!(serial.write_bytes(&expected), 12);
    assert!(signal.take());
    pump.pump(&mut ep);
    assert_eq!(ep.sent, expected[..8]);

    // host goes away with the first packet in flight
    serial.set_configured(false);
    pump.reset_session();
    assert!(!signal.is_requested());
    assert_eq!(serial.pending(), 4);

    serial.set_configured(true);
    for _ in 0..10 {
        if !pump.is_busy() && signal.take() {
            pump.pump(&mut ep);
        }
    }

    assert_eq!(ep.sent, expected);
    assert_eq!(serial.pending(), 0);
}

#[test]
fn test_reconnect_with_nothing_queued_stays_quiet() {
    let mut buffer = AccumulationBuffer::<16>::new();
    let signal = PumpSignal::new();
    let (producer, _consumer) = buffer.split();
    let mut serial: UsbSerial<'_, 16, 4> = UsbSerial::new(producer, &signal);

    serial.set_configured(true);
    serial.set_configured(false);
    serial.set_configured(true);

    assert!(!signal.is_requested());
}
