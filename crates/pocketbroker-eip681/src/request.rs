//! Structured payment request types.
//!
//! A [`PaymentRequest`] is the decoded form of an EIP-681 URI: a validated
//! address plus [`PaymentParams`]. The same [`PaymentParams`] doubles as the
//! options bag for [`generate_ethereum_qr`](crate::generate_ethereum_qr).
//!
//! Every field is kept as the original decimal or hex string. Values in wei
//! routinely exceed `u64`, and keeping the string means a request can be
//! re-emitted exactly as it was read.
//!
//! # Serialization
//!
//! Recognized parameters serialize as camelCase keys. Extra parameters are
//! nested under `extra`, so a query key such as `address` or `ok` can never
//! shadow a field of the enclosing document:
//!
//! ```
//! use pocketbroker_eip681::PaymentParams;
//!
//! let params = PaymentParams::new().with_chain_id(8453).with_extra("label", "coffee");
//! let json = serde_json::to_string(&params).unwrap();
//! assert_eq!(json, r#"{"chainId":"8453","extra":{"label":"coffee"}}"#);
//! ```
//!
//! Deserialization also accepts extras as top-level keys, which keeps
//! hand-written options bags short: `{"value":"1","label":"coffee"}`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The query keys with defined meaning. Anything else is an extra parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    ChainId,
    Value,
    Data,
    Gas,
    GasLimit,
    GasPrice,
}

impl ParamKey {
    /// Recognized keys in the order the generator emits them.
    pub const ALL: [ParamKey; 6] = [
        ParamKey::ChainId,
        ParamKey::Value,
        ParamKey::Data,
        ParamKey::Gas,
        ParamKey::GasLimit,
        ParamKey::GasPrice,
    ];

    /// The key as it appears in the query string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::ChainId => "chainId",
            ParamKey::Value => "value",
            ParamKey::Data => "data",
            ParamKey::Gas => "gas",
            ParamKey::GasLimit => "gasLimit",
            ParamKey::GasPrice => "gasPrice",
        }
    }

    /// Matches a query key exactly (keys are case-sensitive).
    pub fn from_wire(key: &str) -> Option<Self> {
        ParamKey::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized query parameters, in first-seen order.
///
/// Inserting an existing key replaces its value in place, matching the
/// last-one-wins resolution of repeated query keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraParams(Vec<(String, String)>);

impl ExtraParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut extra = ExtraParams::new();
        for (k, v) in iter {
            extra.insert(k, v);
        }
        extra
    }
}

impl Serialize for ExtraParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Key under which [`PaymentParams`] serializes its extra parameters.
pub const EXTRA_KEY: &str = "extra";

impl<'de> Deserialize<'de> for ExtraParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExtraVisitor;

        impl<'de> Visitor<'de> for ExtraVisitor {
            type Value = ExtraParams;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string or number values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum ExtraValue {
                    Nested(ExtraParams),
                    Scalar(Stringified),
                }

                let mut extra = ExtraParams::new();
                while let Some(key) = access.next_key::<String>()? {
                    if key != EXTRA_KEY {
                        let value = access.next_value::<Stringified>()?;
                        extra.insert(key, value.0);
                        continue;
                    }
                    match access.next_value::<ExtraValue>()? {
                        ExtraValue::Nested(nested) => {
                            for (k, v) in nested.0 {
                                extra.insert(k, v);
                            }
                        }
                        ExtraValue::Scalar(value) => extra.insert(key, value.0),
                    }
                }
                Ok(extra)
            }
        }

        deserializer.deserialize_map(ExtraVisitor)
    }
}

/// Optional payment parameters carried in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParams {
    #[serde(default, deserialize_with = "stringified::deserialize")]
    pub chain_id: Option<String>,
    /// Amount in wei.
    #[serde(default, deserialize_with = "stringified::deserialize")]
    pub value: Option<String>,
    /// `0x`-prefixed call data.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "stringified::deserialize")]
    pub gas: Option<String>,
    #[serde(default, deserialize_with = "stringified::deserialize")]
    pub gas_limit: Option<String>,
    #[serde(default, deserialize_with = "stringified::deserialize")]
    pub gas_price: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraParams,
}

impl PaymentParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain_id<V: fmt::Display>(mut self, chain_id: V) -> Self {
        self.chain_id = Some(chain_id.to_string());
        self
    }

    pub fn with_value<V: fmt::Display>(mut self, value: V) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_data<V: Into<String>>(mut self, data: V) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_gas<V: fmt::Display>(mut self, gas: V) -> Self {
        self.gas = Some(gas.to_string());
        self
    }

    pub fn with_gas_limit<V: fmt::Display>(mut self, gas_limit: V) -> Self {
        self.gas_limit = Some(gas_limit.to_string());
        self
    }

    pub fn with_gas_price<V: fmt::Display>(mut self, gas_price: V) -> Self {
        self.gas_price = Some(gas_price.to_string());
        self
    }

    pub fn with_extra<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Returns the value of a recognized parameter.
    pub fn get(&self, key: ParamKey) -> Option<&str> {
        match key {
            ParamKey::ChainId => self.chain_id.as_deref(),
            ParamKey::Value => self.value.as_deref(),
            ParamKey::Data => self.data.as_deref(),
            ParamKey::Gas => self.gas.as_deref(),
            ParamKey::GasLimit => self.gas_limit.as_deref(),
            ParamKey::GasPrice => self.gas_price.as_deref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, key: ParamKey) -> &mut Option<String> {
        match key {
            ParamKey::ChainId => &mut self.chain_id,
            ParamKey::Value => &mut self.value,
            ParamKey::Data => &mut self.data,
            ParamKey::Gas => &mut self.gas,
            ParamKey::GasLimit => &mut self.gas_limit,
            ParamKey::GasPrice => &mut self.gas_price,
        }
    }

    /// `true` when no recognized or extra parameter is set.
    pub fn is_empty(&self) -> bool {
        ParamKey::ALL.iter().all(|k| self.get(*k).is_none()) && self.extra.is_empty()
    }
}

impl Serialize for PaymentParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for key in ParamKey::ALL {
            if let Some(value) = self.get(key) {
                map.serialize_entry(key.as_str(), value)?;
            }
        }
        if !self.extra.is_empty() {
            map.serialize_entry(EXTRA_KEY, &self.extra)?;
        }
        map.end()
    }
}

/// A decoded and validated payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// The address exactly as it appeared in the URI.
    pub address: String,
    #[serde(flatten)]
    pub params: PaymentParams,
}

impl PaymentRequest {
    /// Re-encodes the request as an EIP-681 URI.
    ///
    /// Returns `None` only if `address` is not a valid address, which cannot
    /// happen for requests produced by the parser.
    pub fn to_uri(&self) -> Option<String> {
        crate::generate::generate_ethereum_qr(&self.address, &self.params)
    }
}

/// Tagged validation outcome for JSON consumers.
///
/// `{"ok":true,"address":"0x...","value":"1"}` on success,
/// `{"ok":false,"error":"Payload must start with 'ethereum:'"}` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrValidation {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub request: Option<PaymentRequest>,
}

impl<E: fmt::Display> From<Result<PaymentRequest, E>> for QrValidation {
    fn from(result: Result<PaymentRequest, E>) -> Self {
        match result {
            Ok(request) => QrValidation {
                ok: true,
                error: None,
                request: Some(request),
            },
            Err(err) => QrValidation {
                ok: false,
                error: Some(err.to_string()),
                request: None,
            },
        }
    }
}

/// A string that may arrive as a JSON number; numbers keep their decimal form.
struct Stringified(String);

impl<'de> Deserialize<'de> for Stringified {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            String(String),
            Unsigned(u64),
            Signed(i64),
            Float(f64),
        }

        Ok(Stringified(match Wire::deserialize(deserializer)? {
            Wire::String(s) => s,
            Wire::Unsigned(n) => n.to_string(),
            Wire::Signed(n) => n.to_string(),
            Wire::Float(n) => n.to_string(),
        }))
    }
}

mod stringified {
    use super::Stringified;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Stringified>::deserialize(deserializer)?;
        Ok(value.map(|s| s.0))
    }
}
