use super::memory::MemoryCache;
use crate::core::Clock;
use std::sync::Arc;
use std::time::Duration;

pub const PRICE_TTL: Duration = Duration::from_secs(60);

/// Coin-keyed cache of USD unit prices.
///
/// Unbounded unless a capacity is given: the key space is the fixed set of
/// supported coins. Revisit if coin ids ever come from callers.
pub struct PriceCache {
    entries: MemoryCache<String, f64>,
    clock: Arc<dyn Clock>,
}

impl PriceCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(clock, PRICE_TTL, None)
    }

    pub fn with_limits(clock: Arc<dyn Clock>, ttl: Duration, capacity: Option<usize>) -> Self {
        Self {
            entries: MemoryCache::new(ttl, capacity),
            clock,
        }
    }

    pub async fn get(&self, coin_id: &str) -> Option<f64> {
        self.entries
            .get_fresh(&coin_id.to_string(), self.clock.now())
            .await
    }

    pub async fn put(&self, coin_id: &str, price: f64) {
        self.entries
            .put(coin_id.to_string(), price, self.clock.now())
            .await;
    }

    pub async fn len(&self) -> usize {
        self.entries.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.is_empty().await
    }
}
