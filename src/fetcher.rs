//! Cache-fronted balance retrieval.
use crate::core::error::Result;
use crate::core::{AddressType, BalanceProvider, BalanceRecord, Clock, PriceProvider};
use crate::store::BalanceCache;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves an address to a priced balance record, serving fresh records from
/// the balance cache and going upstream otherwise.
///
/// Concurrent misses for the same address are not coalesced; each one queries
/// the upstream providers and the last write wins.
pub struct AddressDataFetcher {
    balances: Arc<dyn BalanceProvider>,
    prices: Arc<dyn PriceProvider>,
    cache: Arc<BalanceCache>,
    clock: Arc<dyn Clock>,
}

impl AddressDataFetcher {
    pub fn new(
        balances: Arc<dyn BalanceProvider>,
        prices: Arc<dyn PriceProvider>,
        cache: Arc<BalanceCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            balances,
            prices,
            cache,
            clock,
        }
    }

    /// Validates `address_type` before touching the cache or the network.
    pub async fn fetch(&self, address: &str, address_type: &str) -> Result<BalanceRecord> {
        let address_type: AddressType = address_type.parse()?;
        self.fetch_as(address, address_type).await
    }

    pub async fn fetch_as(&self, address: &str, address_type: AddressType) -> Result<BalanceRecord> {
        if let Some(cached) = self.cache.get(address, address_type).await {
            debug!(
                %address,
                %address_type,
                balance = cached.balance,
                "Serving balance from cache"
            );
            return Ok(cached);
        }

        info!(%address, %address_type, "Cache miss or stale, fetching from upstream");
        let holdings = self.balances.fetch_holdings(address, address_type).await?;
        let unit_price = self.prices.fetch_usd_price(address_type.coin_id()).await?;

        let record = BalanceRecord::new(
            address,
            address_type,
            holdings,
            unit_price,
            self.clock.now(),
        );
        self.cache.put(address, record.clone()).await;
        info!(
            %address,
            balance = record.balance,
            symbol = %record.currency_symbol,
            n_tx = record.transaction_count,
            "Stored balance record"
        );

        Ok(record)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::clock::testing::ManualClock;
    use crate::core::{Holdings, LookupError};
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Balance provider returning 1 native unit and counting its calls.
    pub(crate) struct MockBalances {
        pub calls: AtomicUsize,
        pub fail_with: Option<LookupError>,
    }

    impl MockBalances {
        pub fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        pub fn failing(err: LookupError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(err),
            }
        }
    }

    #[async_trait]
    impl BalanceProvider for MockBalances {
        async fn fetch_holdings(&self, _address: &str, address_type: AddressType) -> Result<Holdings> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Suspend like a real request so overlapping lookups interleave
            tokio::task::yield_now().await;
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(Holdings {
                smallest_units: address_type.unit_divisor(),
                transaction_count: 2,
            })
        }
    }

    pub(crate) struct MockPrices {
        pub calls: AtomicUsize,
        pub price: Option<f64>,
    }

    impl MockPrices {
        pub fn new(price: f64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                price: Some(price),
            }
        }
    }

    #[async_trait]
    impl PriceProvider for MockPrices {
        async fn fetch_usd_price(&self, coin_id: &str) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.price.ok_or_else(|| LookupError::Upstream {
                status: 200,
                message: format!("No USD price found for {coin_id}"),
            })
        }
    }

    struct Harness {
        balances: Arc<MockBalances>,
        prices: Arc<MockPrices>,
        cache: Arc<BalanceCache>,
        clock: Arc<ManualClock>,
        fetcher: AddressDataFetcher,
    }

    fn harness(balances: MockBalances, prices: MockPrices) -> Harness {
        let balances = Arc::new(balances);
        let prices = Arc::new(prices);
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(BalanceCache::new(clock.clone()));
        let fetcher = AddressDataFetcher::new(
            balances.clone(),
            prices.clone(),
            Arc::clone(&cache),
            clock.clone(),
        );
        Harness {
            balances,
            prices,
            cache,
            clock,
            fetcher,
        }
    }

    #[tokio::test]
    async fn test_miss_fetches_prices_and_stores() {
        let h = harness(MockBalances::new(), MockPrices::new(2_000.0));

        let record = h.fetcher.fetch("0xabc", "ethereum").await.unwrap();

        assert_eq!(record.balance, 1.0);
        assert_eq!(record.usd_value, 2_000.0);
        assert_eq!(record.currency_symbol, "ETH");
        assert_eq!(record.transaction_count, 2);
        assert_eq!(record.fetched_at, h.clock.now());
        assert!(h.cache.contains("0xabc").await);
    }

    #[tokio::test]
    async fn test_hit_within_ttl_makes_no_upstream_calls() {
        let h = harness(MockBalances::new(), MockPrices::new(50_000.0));

        let first = h.fetcher.fetch("1abc", "bitcoin").await.unwrap();
        h.clock.advance(TimeDelta::minutes(4));
        let second = h.fetcher.fetch("1abc", "bitcoin").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.balances.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.prices.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_balance_is_refetched() {
        let h = harness(MockBalances::new(), MockPrices::new(50_000.0));

        h.fetcher.fetch("1abc", "bitcoin").await.unwrap();
        h.clock.advance(TimeDelta::minutes(5) + TimeDelta::seconds(1));
        let refreshed = h.fetcher.fetch("1abc", "bitcoin").await.unwrap();

        assert_eq!(h.balances.calls.load(Ordering::SeqCst), 2);
        assert_eq!(refreshed.fetched_at, h.clock.now());
    }

    #[tokio::test]
    async fn test_type_mismatch_forces_refetch() {
        let h = harness(MockBalances::new(), MockPrices::new(300.0));

        h.fetcher.fetch("qshared", "bitcoin").await.unwrap();
        let record = h.fetcher.fetch("qshared", "bitcoincash").await.unwrap();

        assert_eq!(record.address_type, AddressType::BitcoinCash);
        assert_eq!(record.currency_symbol, "BCH");
        assert_eq!(h.balances.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_unsupported_type_makes_no_calls() {
        let h = harness(MockBalances::new(), MockPrices::new(1.0));

        let err = h.fetcher.fetch("DAbc", "dogecoin").await.unwrap_err();

        assert_eq!(err, LookupError::UnsupportedType("dogecoin".to_string()));
        assert_eq!(h.balances.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.prices.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_balance_failure_writes_nothing() {
        let h = harness(
            MockBalances::failing(LookupError::Timeout {
                target: "1abc".to_string(),
            }),
            MockPrices::new(1.0),
        );

        let err = h.fetcher.fetch("1abc", "bitcoin").await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(h.prices.calls.load(Ordering::SeqCst), 0);
        assert!(h.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_price_failure_writes_nothing() {
        let mut prices = MockPrices::new(1.0);
        prices.price = None;
        let h = harness(MockBalances::new(), prices);

        let err = h.fetcher.fetch("1abc", "bitcoin").await.unwrap_err();

        assert!(matches!(err, LookupError::Upstream { .. }));
        assert!(h.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_identical_misses_are_not_coalesced() {
        let h = harness(MockBalances::new(), MockPrices::new(1.0));

        let (a, b) = tokio::join!(
            h.fetcher.fetch("1abc", "bitcoin"),
            h.fetcher.fetch("1abc", "bitcoin")
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(h.balances.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.cache.len().await, 1);
    }
}
