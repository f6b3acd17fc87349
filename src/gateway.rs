//! The single lookup boundary exposed to callers.
//!
//! Every outcome, including malformed requests, is turned into a
//! [`LookupResponse`]; nothing fails across this boundary.

use crate::core::error::ErrorKind;
use crate::fetcher::AddressDataFetcher;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const GET_BALANCE: &str = "GET_BALANCE";

/// Wire request: `{"type": "GET_BALANCE", "address": ..., "addressType": ...}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub address: Option<String>,
    #[serde(rename = "addressType")]
    pub address_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LookupResponse {
    Success {
        balance: f64,
        #[serde(rename = "n_tx", alias = "transactionCount")]
        transaction_count: u64,
        #[serde(rename = "usdValue")]
        usd_value: f64,
        #[serde(rename = "currencySymbol")]
        currency_symbol: String,
        address: String,
        #[serde(rename = "type")]
        address_type: String,
    },
    Error {
        message: String,
        address: String,
        #[serde(rename = "type")]
        address_type: String,
        #[serde(skip)]
        kind: Option<ErrorKind>,
    },
}

impl LookupResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupResponse::Success { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            LookupResponse::Success { .. } => None,
            LookupResponse::Error { kind, .. } => *kind,
        }
    }

    fn invalid(message: String, address: Option<String>, address_type: Option<String>) -> Self {
        LookupResponse::Error {
            message,
            address: address.unwrap_or_default(),
            address_type: address_type.unwrap_or_default(),
            kind: Some(ErrorKind::InvalidRequest),
        }
    }
}

pub struct RequestGateway {
    fetcher: AddressDataFetcher,
}

impl RequestGateway {
    pub fn new(fetcher: AddressDataFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn lookup(&self, address: &str, address_type: &str) -> LookupResponse {
        match self.fetcher.fetch(address, address_type).await {
            Ok(record) => {
                debug!(%address, %address_type, "Sending success response");
                LookupResponse::Success {
                    balance: record.balance,
                    transaction_count: record.transaction_count,
                    usd_value: record.usd_value,
                    currency_symbol: record.currency_symbol,
                    address: address.to_string(),
                    address_type: record.address_type.to_string(),
                }
            }
            Err(e) => {
                error!(%address, %address_type, error = %e, "Sending error response");
                LookupResponse::Error {
                    message: e.to_string(),
                    address: address.to_string(),
                    address_type: address_type.to_string(),
                    kind: Some(e.kind()),
                }
            }
        }
    }

    /// Handles one raw JSON message from the messaging layer.
    pub async fn handle_message(&self, raw: &str) -> LookupResponse {
        let request: LookupRequest = match serde_json::from_str(raw) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Malformed lookup request");
                return LookupResponse::invalid(format!("Malformed request: {e}"), None, None);
            }
        };

        match request {
            LookupRequest {
                kind,
                address: Some(address),
                address_type: Some(address_type),
            } if kind == GET_BALANCE => self.lookup(&address, &address_type).await,
            LookupRequest {
                kind,
                address,
                address_type,
            } => LookupResponse::invalid(
                format!("Unsupported request: {kind}"),
                address,
                address_type,
            ),
        }
    }
}
