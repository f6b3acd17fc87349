//! Balance abstractions and core types

use crate::core::address::AddressType;
use crate::core::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-agnostic holdings of an address, in the chain's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Holdings {
    pub smallest_units: f64,
    pub transaction_count: u64,
}

impl Holdings {
    /// Balance converted to the chain's native unit (BTC, ETH, BCH).
    pub fn native_balance(&self, address_type: AddressType) -> f64 {
        self.smallest_units / address_type.unit_divisor()
    }
}

/// Canonical record stored in the balance cache. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    pub address: String,
    pub address_type: AddressType,
    pub balance: f64,
    pub transaction_count: u64,
    pub usd_value: f64,
    pub currency_symbol: String,
    pub fetched_at: DateTime<Utc>,
}

impl BalanceRecord {
    pub fn new(
        address: &str,
        address_type: AddressType,
        holdings: Holdings,
        unit_price_usd: f64,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let balance = holdings.native_balance(address_type);
        Self {
            address: address.to_string(),
            address_type,
            balance,
            transaction_count: holdings.transaction_count,
            usd_value: balance * unit_price_usd,
            currency_symbol: address_type.currency_symbol().to_string(),
            fetched_at,
        }
    }
}

#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn fetch_holdings(&self, address: &str, address_type: AddressType) -> Result<Holdings>;
}
