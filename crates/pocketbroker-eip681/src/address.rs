//! Ethereum account address validation.
//!
//! Addresses are accepted in the three forms wallets produce:
//!
//! - all-lowercase hex (`0xd8da6bf2...`), carrying no checksum
//! - all-uppercase hex (`0xD8DA6BF2...`), carrying no checksum
//! - [EIP-55](https://eips.ethereum.org/EIPS/eip-55) mixed-case hex, where the
//!   casing of every letter must match the keccak-256 checksum
//!
//! Validation never re-cases the input: callers get back exactly the string
//! they supplied.

use alloy_primitives::Address;
use std::str::FromStr;

use crate::uri::SCHEME;

/// Number of hex digits in an account address (20 bytes).
pub const ADDRESS_HEX_LEN: usize = 40;

/// Reasons an address string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The input is empty.
    #[error("Address is empty")]
    Empty,
    /// Missing `0x`, wrong length, or non-hex characters.
    #[error("Address must be 0x followed by 40 hex digits")]
    Format,
    /// Mixed-case input whose casing does not match the EIP-55 checksum.
    #[error("Address checksum mismatch")]
    Checksum,
}

/// Validates an address string and returns the decoded 20-byte address.
///
/// # Example
///
/// ```
/// use pocketbroker_eip681::address::validate_address;
///
/// assert!(validate_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").is_ok());
/// assert!(validate_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").is_ok());
/// assert!(validate_address("0xd8Da6BF26964aF9D7eEd9e03E53415D37aA96045").is_err());
/// ```
pub fn validate_address(input: &str) -> Result<Address, AddressError> {
    if input.is_empty() {
        return Err(AddressError::Empty);
    }
    let digits = input.strip_prefix("0x").ok_or(AddressError::Format)?;
    if digits.len() != ADDRESS_HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::Format);
    }
    let address = Address::from_str(input).map_err(|_| AddressError::Format)?;

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != input {
        return Err(AddressError::Checksum);
    }
    Ok(address)
}

/// Returns `true` if `input` is a well-formed, checksum-consistent address.
pub fn is_valid_address(input: &str) -> bool {
    validate_address(input).is_ok()
}

/// Extracts a bare address from loosely formatted user input.
///
/// Accepts a plain address or a payment URI fragment such as
/// `ethereum:0x...@8453?value=1`. The scheme prefix, the query string, the
/// `@chainId` suffix and a single leading `/` are dropped before validation.
/// Returns `None` when what remains is not a valid address.
///
/// # Example
///
/// ```
/// use pocketbroker_eip681::address::parse_ethereum_address;
///
/// let parsed = parse_ethereum_address("ETHEREUM:0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045@1?value=5");
/// assert_eq!(parsed.as_deref(), Some("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"));
/// assert_eq!(parse_ethereum_address("hello"), None);
/// ```
pub fn parse_ethereum_address(input: &str) -> Option<String> {
    let input = input.trim();
    let rest = strip_scheme(input).unwrap_or(input);
    let rest = rest.split_once('?').map_or(rest, |(head, _)| head);
    let rest = rest.split_once('@').map_or(rest, |(head, _)| head);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    is_valid_address(rest).then(|| rest.to_string())
}

/// Strips a case-insensitive `ethereum:` prefix.
pub(crate) fn strip_scheme(input: &str) -> Option<&str> {
    let prefix = input.get(..SCHEME.len())?;
    if prefix.eq_ignore_ascii_case(SCHEME) {
        input.get(SCHEME.len()..)
    } else {
        None
    }
}
