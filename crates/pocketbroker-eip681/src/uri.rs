//! EIP-681 payment URI parsing.
//!
//! Grammar accepted by [`validate_ethereum_qr`]:
//!
//! ```text
//! ethereum:[/]<address>[@<chainId>][?<key>=<value>[&<key>=<value>...]][#fragment]
//! ```
//!
//! The scheme is matched case-insensitively. A `chainId` query parameter takes
//! precedence over the positional `@<chainId>` suffix. Recognized parameters are
//! validated; everything else is carried through untouched.

use regex::Regex;
use std::sync::LazyLock;

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::address::{is_valid_address, strip_scheme};
use crate::chain::Eip155ChainReference;
use crate::error::Eip681Error;
use crate::query::{QueryError, decode_path_component, parse_query};
use crate::request::{ParamKey, PaymentParams, PaymentRequest};
use crate::units::parse_decimal_u256;

/// URI scheme, including the colon. Always emitted lowercase.
pub const SCHEME: &str = "ethereum:";

static HEX_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]*$").expect("valid regex"));

/// Gas fields, checked in this order.
const GAS_KEYS: [ParamKey; 3] = [ParamKey::Gas, ParamKey::GasLimit, ParamKey::GasPrice];

/// Parses and validates an EIP-681 payment URI.
///
/// When `expected_chain_id` is given and the payload names a chain, the two
/// must match. A payload without any chain id is accepted regardless.
///
/// The returned address keeps the casing it had in the payload, and every
/// parameter keeps its decoded string form. A recognized key given with an
/// empty value is treated as absent; for repeated keys the last one wins.
///
/// # Example
///
/// ```
/// use pocketbroker_eip681::{Eip681Error, validate_ethereum_qr};
///
/// let request = validate_ethereum_qr(
///     "ethereum:0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045@1?chainId=8453&value=1",
///     None,
/// )
/// .unwrap();
/// assert_eq!(request.params.chain_id.as_deref(), Some("8453"));
/// assert_eq!(request.params.value.as_deref(), Some("1"));
///
/// assert_eq!(
///     validate_ethereum_qr("not-an-address", None),
///     Err(Eip681Error::BadScheme)
/// );
/// ```
#[cfg_attr(
    feature = "telemetry",
    instrument(
        level = "debug",
        skip(payload),
        fields(payload_len = payload.len()),
        err(Display, level = "debug")
    )
)]
pub fn validate_ethereum_qr(
    payload: &str,
    expected_chain_id: Option<u64>,
) -> Result<PaymentRequest, Eip681Error> {
    if payload.is_empty() {
        return Err(Eip681Error::EmptyPayload);
    }
    let rest = strip_scheme(payload).ok_or(Eip681Error::BadScheme)?;
    let rest = rest.split_once('#').map_or(rest, |(head, _)| head);
    let (target, query) = rest.split_once('?').unwrap_or((rest, ""));

    let target = target.strip_prefix('/').unwrap_or(target);
    let (address, suffix_chain_id) = match target.split_once('@') {
        Some((address, chain_id)) => (address, Some(chain_id)),
        None => (target, None),
    };

    let malformed = |e: QueryError| Eip681Error::MalformedUri(e.to_string());
    let address = decode_path_component(address).map_err(malformed)?;
    let suffix_chain_id = suffix_chain_id
        .map(decode_path_component)
        .transpose()
        .map_err(malformed)?;
    let pairs = parse_query(query).map_err(malformed)?;

    if address.is_empty() {
        return Err(Eip681Error::MissingAddress);
    }
    if !is_valid_address(&address) {
        return Err(Eip681Error::InvalidAddress);
    }

    let mut params = PaymentParams::new();
    for (key, value) in pairs {
        match ParamKey::from_wire(&key) {
            Some(known) => *params.slot_mut(known) = (!value.is_empty()).then_some(value),
            None => params.extra.insert(key, value),
        }
    }
    if params.chain_id.is_none() {
        params.chain_id = suffix_chain_id.filter(|chain_id| !chain_id.is_empty());
    }

    check_chain_id(params.chain_id.as_deref(), expected_chain_id)?;
    if let Some(value) = params.value.as_deref() {
        check_value(value)?;
    }
    if let Some(data) = params.data.as_deref() {
        if !HEX_DATA.is_match(data) {
            return Err(Eip681Error::InvalidDataHex);
        }
    }
    for key in GAS_KEYS {
        if let Some(gas) = params.get(key) {
            if parse_decimal_u256(gas).is_none() {
                return Err(Eip681Error::InvalidGasField { field: key });
            }
        }
    }

    Ok(PaymentRequest { address, params })
}

fn check_chain_id(chain_id: Option<&str>, expected: Option<u64>) -> Result<(), Eip681Error> {
    let Some(chain_id) = chain_id else {
        return Ok(());
    };
    let parsed: Eip155ChainReference = chain_id
        .parse()
        .map_err(|_| Eip681Error::InvalidChainId)?;
    match expected {
        Some(expected) if parsed.inner() != expected => Err(Eip681Error::ChainIdMismatch {
            expected,
            actual: chain_id.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_value(value: &str) -> Result<(), Eip681Error> {
    if parse_decimal_u256(value).is_some() {
        return Ok(());
    }
    match value.strip_prefix('-') {
        Some(magnitude) if parse_decimal_u256(magnitude).is_some() => {
            Err(Eip681Error::NegativeValue)
        }
        _ => Err(Eip681Error::InvalidValue),
    }
}
