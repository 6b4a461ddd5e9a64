// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use ember_common::DEFAULT_BAUD_RATE;

use crate::commands;
use crate::transport::Transport;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "ember-term")]
#[command(about = "Terminal and loopback tester for the Ember USB serial bridge")]
pub struct Cli {
    /// Serial port (e.g., /dev/ttyACM0)
    #[arg(short, long)]
    pub port: String,

    /// Baud rate reported to the device
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print everything the device sends
    Monitor {
        /// Stop after this many seconds (default: run until interrupted)
        #[arg(short, long)]
        seconds: Option<u64>,
    },

    /// Send a file or a string to the device
    Send {
        /// File to send
        #[arg(value_name = "FILE", conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Text to send instead of a file
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Send a test pattern and verify the device echoes it back intact
    Loopback {
        /// Number of bytes to send
        #[arg(short, long, default_value = "4096")]
        size: usize,
    },
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    let mut transport = Transport::new(&cli.port, cli.baud)?;

    match cli.command {
        Commands::Monitor { seconds } => commands::monitor(&mut transport, seconds),
        Commands::Send { file, text } => {
            let data = match (file, text) {
                (Some(file), None) => commands::read_file(&file)?,
                (None, Some(text)) => text.into_bytes(),
                _ => bail!("either FILE or --text is required"),
            };
            commands::send(&mut transport, &data)
        }
        Commands::Loopback { size } => commands::loopback(&mut transport, size),
    }
}
