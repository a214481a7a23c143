//! PocketBroker payment QR command-line entrypoint.
//!
//! Wraps the EIP-681 codec for shell scripts and support tooling:
//!
//! - `validate` – parse and validate an `ethereum:` payment URI
//! - `generate` – build a payment URI from an address and options
//! - `address` – extract a bare address from an address or URI
//! - `wei-to-eth` / `eth-to-wei` – amount conversion
//!
//! Each command prints one JSON document to stdout and exits non-zero when the
//! document has `"ok": false`.
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `RUST_LOG` controls log verbosity (stderr), `LOG_FORMAT=compact` shortens lines
//! - `EIP681_EXPECTED_CHAIN_ID`, `EIP681_DISPLAY_DECIMALS`, `POCKETBROKER_PRETTY`

mod commands;
mod config;
mod telemetry;

use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;

use crate::config::Cli;
use crate::telemetry::Telemetry;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load .env variables
    dotenv().ok();

    let cli = Cli::parse();
    Telemetry::new().verbose(cli.verbose).register();

    let outcome = commands::run(cli.command)?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&outcome.document)?
    } else {
        serde_json::to_string(&outcome.document)?
    };
    println!("{rendered}");

    Ok(if outcome.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
