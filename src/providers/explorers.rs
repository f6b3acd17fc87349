//! Balance lookups against public block explorers, one per address type.

use super::util::{UpstreamBody, get_with_deadline};
use crate::core::address::strip_cashaddr_prefix;
use crate::core::config::ProvidersConfig;
use crate::core::error::Result;
use crate::core::{AddressType, BalanceProvider, Holdings, LookupError};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// blockchain.info keys its response by the queried address.
type BlockchainInfoResponse = HashMap<String, BlockchainInfoEntry>;

#[derive(Debug, Deserialize)]
struct BlockchainInfoEntry {
    final_balance: Option<f64>,
    n_tx: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BlockcypherResponse {
    balance: Option<f64>,
    n_tx: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BlockchairResponse {
    data: Option<BlockchairData>,
}

/// Blockchair sends `[]` instead of an object when nothing matched. Any other
/// shape fails to parse.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BlockchairData {
    Keyed(HashMap<String, BlockchairDashboard>),
    Empty([(); 0]),
}

#[derive(Debug, Deserialize)]
struct BlockchairDashboard {
    address: Option<BlockchairAddress>,
}

#[derive(Debug, Deserialize)]
struct BlockchairAddress {
    balance: Option<f64>,
    transaction_count: Option<u64>,
}

#[derive(Debug)]
enum ExplorerResponse {
    Bitcoin(BlockchainInfoResponse),
    Ethereum(BlockcypherResponse),
    BitcoinCash(BlockchairResponse),
}

impl ExplorerResponse {
    fn parse(address_type: AddressType, body: &UpstreamBody) -> Result<Self> {
        Ok(match address_type {
            AddressType::Bitcoin => ExplorerResponse::Bitcoin(body.parse()?),
            AddressType::Ethereum => ExplorerResponse::Ethereum(body.parse()?),
            AddressType::BitcoinCash => ExplorerResponse::BitcoinCash(body.parse()?),
        })
    }

    /// Missing entries or fields count as zero.
    fn into_holdings(self, lookup_key: &str) -> Holdings {
        let (balance, n_tx) = match self {
            ExplorerResponse::Bitcoin(mut by_address) => by_address
                .remove(lookup_key)
                .map_or((None, None), |entry| (entry.final_balance, entry.n_tx)),
            ExplorerResponse::Ethereum(account) => (account.balance, account.n_tx),
            ExplorerResponse::BitcoinCash(response) => match response.data {
                Some(BlockchairData::Keyed(mut by_address)) => by_address
                    .remove(lookup_key)
                    .and_then(|dashboard| dashboard.address)
                    .map_or((None, None), |address| {
                        (address.balance, address.transaction_count)
                    }),
                Some(BlockchairData::Empty(_)) | None => (None, None),
            },
        };

        Holdings {
            smallest_units: balance.unwrap_or(0.0),
            transaction_count: n_tx.unwrap_or(0),
        }
    }
}

pub struct ExplorerBalanceProvider {
    blockchain_info_url: String,
    blockcypher_url: String,
    blockchair_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl ExplorerBalanceProvider {
    pub fn new(providers: &ProvidersConfig, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            blockchain_info_url: providers.blockchain_info.base_url.clone(),
            blockcypher_url: providers.blockcypher.base_url.clone(),
            blockchair_url: providers.blockchair.base_url.clone(),
            client,
            timeout,
        }
    }

    /// Endpoint to query and the key the response is indexed by. The address
    /// is percent-encoded into its own path segment or query value.
    fn endpoint(&self, address: &str, address_type: AddressType) -> Result<(Url, String)> {
        let (base, segments, lookup_key): (&str, Vec<&str>, &str) = match address_type {
            AddressType::Bitcoin => (self.blockchain_info_url.as_str(), vec!["balance"], address),
            AddressType::Ethereum => (
                self.blockcypher_url.as_str(),
                vec!["v1", "eth", "main", "addrs", address, "balance"],
                address,
            ),
            AddressType::BitcoinCash => {
                let key = strip_cashaddr_prefix(address);
                (
                    self.blockchair_url.as_str(),
                    vec!["bitcoin-cash", "dashboards", "address", key],
                    key,
                )
            }
        };

        let mut url = Url::parse(base)
            .map_err(|e| LookupError::Network(format!("Invalid provider URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Network(format!("Invalid provider URL {base}")))?
            .pop_if_empty()
            .extend(segments);
        if address_type == AddressType::Bitcoin {
            url.query_pairs_mut().append_pair("active", address);
        }

        Ok((url, lookup_key.to_string()))
    }
}

#[async_trait]
impl BalanceProvider for ExplorerBalanceProvider {
    #[instrument(name = "ExplorerBalanceFetch", skip(self), fields(address = %address, kind = %address_type))]
    async fn fetch_holdings(&self, address: &str, address_type: AddressType) -> Result<Holdings> {
        let (url, lookup_key) = self.endpoint(address, address_type)?;
        info!(%url, "Requesting balance data");

        let body = get_with_deadline(&self.client, url.as_str(), self.timeout, address).await?;
        let holdings = ExplorerResponse::parse(address_type, &body)?.into_holdings(&lookup_key);
        debug!(?holdings, "Normalized explorer response");
        Ok(holdings)
    }
}
