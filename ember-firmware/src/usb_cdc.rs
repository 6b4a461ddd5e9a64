// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB CDC device and the bulk IN endpoint the bridge pump feeds.

use ember_common::{TxEndpoint, MAX_PACKET_SIZE};
use rp2040_hal::usb::UsbBus;
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::device::UsbDeviceState;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

#[derive(Debug, defmt::Format)]
pub enum TransportError {
    StringTooLong,
}

pub struct UsbCdc {
    serial: SerialPort<'static, UsbBus>,
    usb_dev: UsbDevice<'static, UsbBus>,
    tx_packet: [u8; MAX_PACKET_SIZE],
    tx_len: usize,
    tx_pos: usize,
}

impl UsbCdc {
    pub fn new(
        usb_bus: &'static UsbBusAllocator<UsbBus>,
        serial_number: &'static str,
    ) -> Result<Self, TransportError> {
        let serial = SerialPort::new(usb_bus);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x2E8A, 0x000A))
            .strings(&[StringDescriptors::default()
                .manufacturer("ADNT")
                .product("Ember USB Serial")
                .serial_number(serial_number)])
            .map_err(|_| TransportError::StringTooLong)?
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();

        Ok(Self {
            serial,
            usb_dev,
            tx_packet: [0u8; MAX_PACKET_SIZE],
            tx_len: 0,
            tx_pos: 0,
        })
    }

    /// Poll USB device. Must be called frequently.
    pub fn poll(&mut self) -> bool {
        self.usb_dev.poll(&mut [&mut self.serial])
    }

    pub fn is_configured(&self) -> bool {
        self.usb_dev.state() == UsbDeviceState::Configured
    }

    /// The host has a terminal open on the port.
    pub fn dtr(&self) -> bool {
        self.serial.dtr()
    }

    /// Baud rate the host last set on the port.
    pub fn host_baud_rate(&self) -> u32 {
        self.serial.line_coding().data_rate()
    }

    /// Read one OUT packet worth of bytes, 0 when none is waiting.
    pub fn read_packet(&mut self, buf: &mut [u8; MAX_PACKET_SIZE]) -> usize {
        self.serial.read(buf).unwrap_or(0)
    }

    /// True once `usbd_serial` has accepted every byte of the armed packet
    /// and drained its write buffer into the IN endpoint. The host may not
    /// have read the packet yet.
    pub fn transmit_complete(&mut self) -> bool {
        self.push_pending();
        self.tx_pos == self.tx_len && self.serial.flush().is_ok()
    }

    /// Drop whatever is still staged; used when the host goes away.
    pub fn abort_transmit(&mut self) {
        self.tx_len = 0;
        self.tx_pos = 0;
    }

    /// Hand staged bytes to the class, handling WouldBlock by retrying on
    /// the next poll.
    fn push_pending(&mut self) {
        while self.tx_pos < self.tx_len {
            match self.serial.write(&self.tx_packet[self.tx_pos..self.tx_len]) {
                Ok(0) | Err(UsbError::WouldBlock) => break,
                Ok(n) => self.tx_pos += n,
                Err(_) => {
                    defmt::warn!("USB: write failed, dropping {} bytes", self.tx_len - self.tx_pos);
                    self.tx_pos = self.tx_len;
                }
            }
        }
    }
}

impl TxEndpoint for UsbCdc {
    fn buffer(&mut self) -> &mut [u8] {
        &mut self.tx_packet
    }

    fn arm(&mut self, len: usize) {
        self.tx_len = len;
        self.tx_pos = 0;
        self.push_pending();
    }
}
