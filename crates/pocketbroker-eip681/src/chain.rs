//! EVM chain identifiers and the registry of well-known networks.
//!
//! EIP-681 carries the chain id as a bare decimal integer, either as the legacy
//! `@<chainId>` suffix on the address or as the `chainId` query parameter.
//! [`Eip155ChainReference`] is the numeric form of that value.
//!
//! The [`KNOWN_NETWORKS`] table maps the networks the wallet UI offers to their
//! chain ids, so callers can print `base` instead of `8453` and accept a
//! network name where a chain id is expected.
//!
//! ```
//! use pocketbroker_eip681::chain::{Eip155ChainReference, chain_id_by_network_name};
//!
//! let base = chain_id_by_network_name("base").unwrap();
//! assert_eq!(base, Eip155ChainReference::new(8453));
//! assert_eq!(base.as_network_name(), Some("base"));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

/// A numeric chain id for EVM-compatible networks (`1` for Ethereum, `8453` for Base).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Eip155ChainReference(u64);

impl Eip155ChainReference {
    /// Creates a new chain reference from a numeric chain id.
    pub const fn new(chain_id: u64) -> Self {
        Self(chain_id)
    }

    /// Returns the numeric chain id.
    pub fn inner(&self) -> u64 {
        self.0
    }

    /// Returns the well-known network name for this chain id, if any.
    pub fn as_network_name(&self) -> Option<&'static str> {
        network_name_by_chain_id(*self)
    }
}

impl From<u64> for Eip155ChainReference {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Eip155ChainReference> for u64 {
    fn from(value: Eip155ChainReference) -> Self {
        value.0
    }
}

impl Display for Eip155ChainReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a chain id string is not a plain decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid chain id {0}")]
pub struct ChainIdFormatError(String);

impl FromStr for Eip155ChainReference {
    type Err = ChainIdFormatError;

    /// Accepts ASCII decimal digits only: no sign, no `0x`, no exponent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ChainIdFormatError(s.into()));
        }
        s.parse::<u64>()
            .map(Eip155ChainReference)
            .map_err(|_| ChainIdFormatError(s.into()))
    }
}

impl Serialize for Eip155ChainReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Eip155ChainReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Eip155ChainReference)
    }
}

/// A known network: human-readable name plus its chain id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Network name as used on the command line (e.g. `base-sepolia`).
    pub name: &'static str,
    /// Numeric chain id.
    pub chain_id: u64,
}

impl NetworkInfo {
    pub fn chain_reference(&self) -> Eip155ChainReference {
        Eip155ChainReference(self.chain_id)
    }
}

/// Networks the payment flows are expected to target.
pub static KNOWN_NETWORKS: &[NetworkInfo] = &[
    // Ethereum
    NetworkInfo {
        name: "ethereum",
        chain_id: 1,
    },
    NetworkInfo {
        name: "sepolia",
        chain_id: 11155111,
    },
    // Base
    NetworkInfo {
        name: "base",
        chain_id: 8453,
    },
    NetworkInfo {
        name: "base-sepolia",
        chain_id: 84532,
    },
    // L2s and sidechains
    NetworkInfo {
        name: "optimism",
        chain_id: 10,
    },
    NetworkInfo {
        name: "arbitrum",
        chain_id: 42161,
    },
    NetworkInfo {
        name: "polygon",
        chain_id: 137,
    },
    NetworkInfo {
        name: "bsc",
        chain_id: 56,
    },
    NetworkInfo {
        name: "avalanche",
        chain_id: 43114,
    },
];

static NAME_TO_CHAIN_ID: LazyLock<HashMap<&'static str, Eip155ChainReference>> =
    LazyLock::new(|| {
        KNOWN_NETWORKS
            .iter()
            .map(|n| (n.name, n.chain_reference()))
            .collect()
    });

static CHAIN_ID_TO_NAME: LazyLock<HashMap<Eip155ChainReference, &'static str>> =
    LazyLock::new(|| {
        KNOWN_NETWORKS
            .iter()
            .map(|n| (n.chain_reference(), n.name))
            .collect()
    });

/// Looks up a chain id by network name. Names are matched case-insensitively.
pub fn chain_id_by_network_name(name: &str) -> Option<Eip155ChainReference> {
    NAME_TO_CHAIN_ID
        .get(name.to_ascii_lowercase().as_str())
        .copied()
}

/// Looks up the network name for a chain id.
pub fn network_name_by_chain_id(chain_id: Eip155ChainReference) -> Option<&'static str> {
    CHAIN_ID_TO_NAME.get(&chain_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_reference_from_str() {
        assert_eq!(
            "8453".parse::<Eip155ChainReference>().unwrap(),
            Eip155ChainReference::new(8453)
        );
        assert_eq!("0".parse::<Eip155ChainReference>().unwrap().inner(), 0);
    }

    #[test]
    fn test_chain_reference_rejects_non_decimal() {
        for input in ["", "-1", "+1", "0x1", "1e3", "1.0", " 1", "abc"] {
            assert!(
                input.parse::<Eip155ChainReference>().is_err(),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_chain_reference_rejects_overflow() {
        assert!("18446744073709551616".parse::<Eip155ChainReference>().is_err());
        assert!("18446744073709551615".parse::<Eip155ChainReference>().is_ok());
    }

    #[test]
    fn test_chain_reference_serde() {
        let chain = Eip155ChainReference::new(137);
        assert_eq!(serde_json::to_string(&chain).unwrap(), "137");
        let parsed: Eip155ChainReference = serde_json::from_str("137").unwrap();
        assert_eq!(parsed, chain);
    }

    #[test]
    fn test_chain_id_by_network_name() {
        assert_eq!(
            chain_id_by_network_name("base"),
            Some(Eip155ChainReference::new(8453))
        );
        assert_eq!(
            chain_id_by_network_name("Ethereum"),
            Some(Eip155ChainReference::new(1))
        );
        assert_eq!(
            chain_id_by_network_name("base-sepolia"),
            Some(Eip155ChainReference::new(84532))
        );
        assert!(chain_id_by_network_name("solana").is_none());
    }

    #[test]
    fn test_network_name_by_chain_id() {
        assert_eq!(
            network_name_by_chain_id(Eip155ChainReference::new(137)),
            Some("polygon")
        );
        assert_eq!(Eip155ChainReference::new(10).as_network_name(), Some("optimism"));
        assert!(Eip155ChainReference::new(999_999).as_network_name().is_none());
    }

    #[test]
    fn test_known_networks_unique() {
        assert_eq!(NAME_TO_CHAIN_ID.len(), KNOWN_NETWORKS.len());
        assert_eq!(CHAIN_ID_TO_NAME.len(), KNOWN_NETWORKS.len());
    }
}
