pub mod cli;
pub mod core;
pub mod fetcher;
pub mod gateway;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{Clock, SystemClock};
use crate::fetcher::AddressDataFetcher;
use crate::gateway::RequestGateway;
use crate::providers::{CoinGeckoProvider, ExplorerBalanceProvider, util::http_client};
use crate::store::{BalanceCache, PriceCache};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Lookup {
        address: String,
        address_type: String,
        json: bool,
    },
    Serve,
}

/// Wires caches, providers and the fetcher into a gateway. The returned
/// gateway owns every cache for its whole lifetime.
pub fn build_gateway(config: &AppConfig) -> Result<RequestGateway> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let client = http_client(&config.user_agent).context("Failed to build HTTP client")?;

    let balance_cache = Arc::new(BalanceCache::with_limits(
        Arc::clone(&clock),
        config.cache.balance_capacity,
        Duration::from_secs(config.cache.balance_ttl_secs),
    ));
    let price_cache = Arc::new(PriceCache::with_limits(
        Arc::clone(&clock),
        Duration::from_secs(config.cache.price_ttl_secs),
        config.cache.price_capacity,
    ));

    let balances = ExplorerBalanceProvider::new(
        &config.providers,
        client.clone(),
        config.timeouts.balance(),
    );
    let prices = CoinGeckoProvider::new(
        &config.providers.coingecko.base_url,
        client,
        config.timeouts.price(),
        price_cache,
    );

    let fetcher =
        AddressDataFetcher::new(Arc::new(balances), Arc::new(prices), balance_cache, clock);
    Ok(RequestGateway::new(fetcher))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinpeek starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let gateway = build_gateway(&config)?;

    match command {
        AppCommand::Lookup {
            address,
            address_type,
            json,
        } => cli::lookup::run(&gateway, &address, &address_type, json).await,
        AppCommand::Serve => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            cli::serve::serve(Arc::new(gateway), stdin, &mut stdout).await
        }
    }
}
