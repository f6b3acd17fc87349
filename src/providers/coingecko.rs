use super::util::get_with_deadline;
use crate::core::error::{LookupError, Result};
use crate::core::PriceProvider;
use crate::store::PriceCache;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// `{"bitcoin": {"usd": 67000.5}}`; `usd` stays untyped so a non-numeric
/// quote can be reported instead of failing the whole parse.
type SimplePriceResponse = HashMap<String, HashMap<String, serde_json::Value>>;

pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    cache: Arc<PriceCache>,
}

impl CoinGeckoProvider {
    pub fn new(
        base_url: &str,
        client: reqwest::Client,
        timeout: Duration,
        cache: Arc<PriceCache>,
    ) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
            client,
            timeout,
            cache,
        }
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoPriceFetch", skip(self), fields(coin_id = %coin_id))]
    async fn fetch_usd_price(&self, coin_id: &str) -> Result<f64> {
        if let Some(cached) = self.cache.get(coin_id).await {
            return Ok(cached);
        }

        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url, coin_id
        );
        debug!("Requesting price data from {}", url);

        let body = get_with_deadline(&self.client, &url, self.timeout, coin_id).await?;
        let data: SimplePriceResponse = body.parse()?;

        let price = data
            .get(coin_id)
            .and_then(|quotes| quotes.get("usd"))
            .and_then(serde_json::Value::as_f64)
            .filter(|price| *price > 0.0)
            .ok_or_else(|| LookupError::Upstream {
                status: body.status,
                message: format!("No USD price found for {coin_id}"),
            })?;

        self.cache.put(coin_id, price).await;
        Ok(price)
    }
}
