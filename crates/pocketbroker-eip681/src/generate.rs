//! EIP-681 payment URI generation.

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::address::is_valid_address;
use crate::query::encode_component;
use crate::request::{ParamKey, PaymentParams};
use crate::uri::SCHEME;

/// Builds an EIP-681 URI for `address` carrying `options`.
///
/// Recognized parameters are emitted in a fixed order (`chainId`, `value`,
/// `data`, `gas`, `gasLimit`, `gasPrice`) followed by extra parameters in the
/// order they were inserted. Absent or empty recognized values are omitted,
/// as are extra keys that shadow a recognized key. Option values are not
/// validated, only the address is.
///
/// Returns `None` if `address` is not a valid address.
///
/// ```
/// use pocketbroker_eip681::{PaymentParams, generate_ethereum_qr};
///
/// let options = PaymentParams::new()
///     .with_value("500000000000000000")
///     .with_chain_id(8453);
/// assert_eq!(
///     generate_ethereum_qr("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", &options).as_deref(),
///     Some("ethereum:0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045?chainId=8453&value=500000000000000000")
/// );
/// assert_eq!(generate_ethereum_qr("bad-address", &PaymentParams::new()), None);
/// ```
#[cfg_attr(
    feature = "telemetry",
    instrument(level = "debug", skip(options), ret(level = "debug"))
)]
pub fn generate_ethereum_qr(address: &str, options: &PaymentParams) -> Option<String> {
    if !is_valid_address(address) {
        #[cfg(feature = "telemetry")]
        tracing::debug!("refusing to generate URI for invalid address");
        return None;
    }

    let recognized = ParamKey::ALL.into_iter().filter_map(|key| {
        options
            .get(key)
            .filter(|value| !value.is_empty())
            .map(|value| (key.as_str(), value))
    });
    let extra = options
        .extra
        .iter()
        .filter(|(key, _)| !key.is_empty() && ParamKey::from_wire(key).is_none());

    let query = recognized
        .chain(extra)
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&");

    let mut uri = format!("{SCHEME}{address}");
    if !query.is_empty() {
        uri.push('?');
        uri.push_str(&query);
    }
    Some(uri)
}
