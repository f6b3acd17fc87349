//! Pricing abstractions

use crate::core::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Current USD price of one unit of `coin_id`.
    async fn fetch_usd_price(&self, coin_id: &str) -> Result<f64>;
}
