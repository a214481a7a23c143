use crate::request::ParamKey;

/// Reasons a payment URI is rejected by [`validate_ethereum_qr`](crate::validate_ethereum_qr).
///
/// The `Display` output is the user-facing message; UI layers show it as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Eip681Error {
    #[error("Payload must be a non-empty string")]
    EmptyPayload,
    #[error("Payload must start with 'ethereum:'")]
    BadScheme,
    #[error("Missing Ethereum address in payload")]
    MissingAddress,
    #[error("Invalid Ethereum address format")]
    InvalidAddress,
    #[error("Chain ID must be a valid number")]
    InvalidChainId,
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainIdMismatch { expected: u64, actual: String },
    #[error("Value must be a valid number in wei")]
    InvalidValue,
    #[error("Value must be non-negative")]
    NegativeValue,
    #[error("Data must be in hex format (0x...)")]
    InvalidDataHex,
    /// One of `gas`, `gasLimit` or `gasPrice` is not a non-negative integer.
    #[error("{field} must be a valid non-negative number")]
    InvalidGasField { field: ParamKey },
    /// The URI structure itself could not be decoded (e.g. a broken `%` escape).
    #[error("Malformed QR payload: {0}")]
    MalformedUri(String),
}
