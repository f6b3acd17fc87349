//! Supported address types and their per-chain constants

use crate::core::error::LookupError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

const CASHADDR_PREFIX: &str = "bitcoincash:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Bitcoin,
    Ethereum,
    BitcoinCash,
}

impl AddressType {
    /// Identifier used to key the price provider and the price cache.
    pub fn coin_id(&self) -> &'static str {
        match self {
            AddressType::Bitcoin => "bitcoin",
            AddressType::Ethereum => "ethereum",
            AddressType::BitcoinCash => "bitcoin-cash",
        }
    }

    pub fn currency_symbol(&self) -> &'static str {
        match self {
            AddressType::Bitcoin => "BTC",
            AddressType::Ethereum => "ETH",
            AddressType::BitcoinCash => "BCH",
        }
    }

    /// Number of smallest units (satoshi, wei) per native unit.
    pub fn unit_divisor(&self) -> f64 {
        match self {
            AddressType::Bitcoin | AddressType::BitcoinCash => 100_000_000.0,
            AddressType::Ethereum => 1e18,
        }
    }
}

impl Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AddressType::Bitcoin => "bitcoin",
                AddressType::Ethereum => "ethereum",
                AddressType::BitcoinCash => "bitcoincash",
            }
        )
    }
}

impl FromStr for AddressType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitcoin" => Ok(AddressType::Bitcoin),
            "ethereum" => Ok(AddressType::Ethereum),
            "bitcoincash" => Ok(AddressType::BitcoinCash),
            other => Err(LookupError::UnsupportedType(other.to_string())),
        }
    }
}

/// Strips the optional CashAddr `bitcoincash:` prefix, in either case.
pub fn strip_cashaddr_prefix(address: &str) -> &str {
    match address.get(..CASHADDR_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(CASHADDR_PREFIX) => {
            &address[CASHADDR_PREFIX.len()..]
        }
        _ => address,
    }
}
