use super::memory::MemoryCache;
use crate::core::{AddressType, BalanceRecord, Clock};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const MAX_CACHE_SIZE: usize = 128;
pub const BALANCE_TTL: Duration = Duration::from_secs(5 * 60);

/// Address-keyed cache of balance records, bounded with FIFO eviction.
pub struct BalanceCache {
    entries: MemoryCache<String, BalanceRecord>,
    clock: Arc<dyn Clock>,
}

impl BalanceCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(clock, MAX_CACHE_SIZE, BALANCE_TTL)
    }

    pub fn with_limits(clock: Arc<dyn Clock>, capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: MemoryCache::new(ttl, Some(capacity)),
            clock,
        }
    }

    /// Fresh record for `address`, provided it was fetched as `address_type`.
    pub async fn get(&self, address: &str, address_type: AddressType) -> Option<BalanceRecord> {
        self.entries
            .get_fresh_if(&address.to_string(), self.clock.now(), |record| {
                record.address_type == address_type
            })
            .await
    }

    pub async fn put(&self, address: &str, record: BalanceRecord) {
        let fetched_at = record.fetched_at;
        if let Some(evicted) = self
            .entries
            .put(address.to_string(), record, fetched_at)
            .await
        {
            info!(%evicted, "Evicted balance entry to make space");
        }
    }

    pub async fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(&address.to_string()).await
    }

    pub async fn len(&self) -> usize {
        self.entries.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.is_empty().await
    }
}
