//! Transaction status lookup against a block explorer.
//!
//! Confirmation in this design comes from an explorer-style HTTP endpoint,
//! not from the chain client: the explorer's indexer is the arbiter of
//! whether a transaction executed. Its answer is a bare flag that stays
//! ambiguous until the transaction is indexed.

use crate::error::StatusError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use testament_types::{Network, TxHash};

/// Default timeout for status requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Built-in explorer endpoints for the public networks.
const MAIN_ENDPOINT: &str = "https://api.etherscan.io/api";
const TEST_ENDPOINT: &str = "https://api-ropsten.etherscan.io/api";

/// Outcome of one status lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    /// The explorer reports the transaction executed ("1").
    Success,
    /// The explorer reports the transaction reverted ("0").
    Failure,
    /// Anything else: not yet indexed, still pending, or unparseable.
    Unknown,
}

/// Looks up the execution status of a transaction by hash.
#[async_trait]
pub trait StatusLookup: Send + Sync {
    async fn transaction_status(
        &self,
        hash: &TxHash,
        network: Network,
    ) -> Result<TxStatus, StatusError>;
}

/// Raw JSON response from the explorer's status endpoint.
///
/// The API contract: `GET {endpoint}?module=transaction&action=getstatus
/// &txhash={hash}` returns `{"status": "1" | "0" | ...}`.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: String,
}

/// HTTP client for explorer status endpoints.
///
/// Main and test networks have built-in endpoints; private and unrecognized
/// networks have no public explorer and need an explicit override, otherwise
/// lookups fail with [`StatusError::NoEndpoint`].
pub struct ExplorerStatusClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    endpoints: HashMap<Network, String>,
}

impl ExplorerStatusClient {
    /// Create a client with default timeouts and the built-in endpoints.
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        let mut endpoints = HashMap::new();
        endpoints.insert(Network::Main, MAIN_ENDPOINT.to_string());
        endpoints.insert(Network::Test, TEST_ENDPOINT.to_string());
        Self {
            http_client,
            endpoints,
        }
    }

    /// Override or add the endpoint for a network.
    pub fn with_endpoint(mut self, network: Network, url: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        self.endpoints.insert(network, url);
        self
    }

    fn endpoint_for(&self, network: Network) -> Result<&str, StatusError> {
        self.endpoints
            .get(&network)
            .map(String::as_str)
            .ok_or(StatusError::NoEndpoint(network))
    }

    fn status_url(endpoint: &str, hash: &TxHash) -> String {
        format!(
            "{}?module=transaction&action=getstatus&txhash={}",
            endpoint.trim_end_matches('/'),
            hash
        )
    }
}

#[async_trait]
impl StatusLookup for ExplorerStatusClient {
    async fn transaction_status(
        &self,
        hash: &TxHash,
        network: Network,
    ) -> Result<TxStatus, StatusError> {
        let endpoint = self.endpoint_for(network)?;
        let url = Self::status_url(endpoint, hash);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                StatusError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                StatusError::Unreachable(format!("connection failed: {e}"))
            } else {
                StatusError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(StatusError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let status_resp: StatusResponse = response.json().await.map_err(|e| {
            StatusError::InvalidResponse(format!("failed to parse status response: {e}"))
        })?;

        Ok(match status_resp.status.as_str() {
            "1" => TxStatus::Success,
            "0" => TxStatus::Failure,
            _ => TxStatus::Unknown,
        })
    }
}

impl Default for ExplorerStatusClient {
    fn default() -> Self {
        Self::new()
    }
}
