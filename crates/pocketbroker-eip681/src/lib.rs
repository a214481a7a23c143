#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EIP-681 payment request URIs for PocketBroker.
//!
//! [EIP-681](https://eips.ethereum.org/EIPS/eip-681) defines the `ethereum:`
//! URI that wallets scan from deposit QR codes:
//!
//! ```text
//! ethereum:0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045@8453?value=500000000000000000
//! ```
//!
//! This crate is the codec behind the deposit and payment-QR flows. It is pure:
//! no I/O, no global state beyond lazily built lookup tables, and every call
//! is independent.
//!
//! # Operations
//!
//! - [`validate_ethereum_qr`] parses and validates a payload into a [`PaymentRequest`]
//! - [`generate_ethereum_qr`] builds a URI from an address and [`PaymentParams`]
//! - [`parse_ethereum_address`] extracts a bare address from loose user input
//! - [`units::format_wei_to_eth`] / [`units::format_eth_to_wei`] convert amounts
//!
//! # Modules
//!
//! - [`address`] - Address format and EIP-55 checksum validation
//! - [`chain`] - Numeric chain ids and the known network registry
//! - [`query`] - Query-string grammar and percent-encoding
//! - [`request`] - Payment request and parameter types
//! - [`units`] - Wei / ether conversion
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` spans for parse and generate calls

pub mod address;
pub mod chain;
pub mod error;
pub mod generate;
pub mod query;
pub mod request;
pub mod units;
pub mod uri;

pub use address::{is_valid_address, parse_ethereum_address};
pub use error::Eip681Error;
pub use generate::generate_ethereum_qr;
pub use request::{ExtraParams, ParamKey, PaymentParams, PaymentRequest, QrValidation};
pub use units::{format_eth_to_wei, format_wei_to_eth};
pub use uri::validate_ethereum_qr;
