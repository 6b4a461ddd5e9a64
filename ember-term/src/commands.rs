// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations for talking to the bridge.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crc::{Crc, CRC_32_ISO_HDLC};
use indicatif::{ProgressBar, ProgressStyle};

use ember_common::{ACCUMULATION_BUFFER_SIZE, MAX_PACKET_SIZE};

use crate::transport::Transport;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
const CHUNK_SIZE: usize = MAX_PACKET_SIZE;

/// Bytes allowed in flight during a loopback run. Half the device buffer,
/// so the echo never laps the bridge pump.
const LOOPBACK_WINDOW: usize = ACCUMULATION_BUFFER_SIZE / 2;

/// Give up on a loopback run after this long without any echoed byte.
const LOOPBACK_STALL: Duration = Duration::from_secs(2);

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Print device output until `seconds` elapse, or forever.
pub fn monitor(transport: &mut Transport, seconds: Option<u64>) -> Result<()> {
    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));
    let mut stdout = std::io::stdout();
    let mut buf = [0u8; 256];

    while deadline.map_or(true, |d| Instant::now() < d) {
        let n = transport.read_some(&mut buf)?;
        if n > 0 {
            stdout.write_all(&buf[..n])?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Write `data` to the device in packet-sized chunks.
pub fn send(transport: &mut Transport, data: &[u8]) -> Result<()> {
    let pb = progress_bar(data.len())?;

    for chunk in data.chunks(CHUNK_SIZE) {
        transport.write_all(chunk)?;
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    println!("Sent {} bytes (CRC32: 0x{:08x})", data.len(), CRC32.checksum(data));
    Ok(())
}

/// Deterministic test pattern; consecutive runs differ from plain counters
/// so dropped or duplicated packets show up in the checksum.
pub fn pattern(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_F491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Index of the first byte where `received` departs from `expected`.
pub fn first_mismatch(expected: &[u8], received: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(received)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != received.len()).then(|| expected.len().min(received.len())))
}

/// Send a pattern and check that the echo matches it.
pub fn loopback(transport: &mut Transport, size: usize) -> Result<()> {
    let expected = pattern(size);
    let expected_crc = CRC32.checksum(&expected);
    let mut received = Vec::with_capacity(size);
    let mut sent = 0;
    let mut buf = [0u8; 512];

    println!("Loopback: {} bytes (CRC32: 0x{:08x})", size, expected_crc);
    let pb = progress_bar(size)?;
    let start = Instant::now();
    let mut last_progress = Instant::now();

    while received.len() < size {
        if sent < size && sent - received.len() < LOOPBACK_WINDOW {
            let end = (sent + CHUNK_SIZE).min(size);
            transport.write_all(&expected[sent..end])?;
            sent = end;
        }

        let n = transport.read_some(&mut buf)?;
        if n > 0 {
            received.extend_from_slice(&buf[..n]);
            pb.set_position(received.len().min(size) as u64);
            last_progress = Instant::now();
        } else if last_progress.elapsed() > LOOPBACK_STALL {
            pb.abandon();
            bail!(
                "Echo stalled after {} of {} bytes ({} sent)",
                received.len(),
                size,
                sent
            );
        }
    }
    pb.finish_and_clear();

    let elapsed = start.elapsed();
    let received_crc = CRC32.checksum(&received);
    if let Some(index) = first_mismatch(&expected, &received) {
        bail!(
            "Echo mismatch at byte {}: CRC32 0x{:08x} != 0x{:08x}",
            index,
            received_crc,
            expected_crc
        );
    }

    println!(
        "Loopback OK in {:.2}s ({:.1} KB/s)",
        elapsed.as_secs_f64(),
        size as f64 / 1024.0 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}
