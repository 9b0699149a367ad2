//! Remote ABI lookup via the Etherscan API, with Sourcify as fallback

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::Network;

/// Source of verified contract ABIs
#[async_trait::async_trait]
pub trait AbiSource: Send + Sync + 'static {
    /// ABI JSON text for `address`, `Ok(None)` when the contract is unverified
    async fn contract_abi(&self, network: &Network, address: &str) -> Result<Option<String>>;
}

/// Etherscan API response
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    result: serde_json::Value,
}

/// Sourcify API response structures
#[derive(Debug, Deserialize)]
struct SourcifyResponse {
    #[serde(default)]
    abi: Option<serde_json::Value>,
}

/// Explorer client with in-memory caching, including negative results
pub struct ExplorerClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    /// Cache: (chain_id, address) -> ABI text
    cache: Arc<RwLock<HashMap<(u64, String), Option<String>>>>,
}

impl ExplorerClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .context("Failed to create HTTP client")?,
            api_url: api_url.into(),
            api_key,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    async fn lookup_etherscan(&self, chain_id: u64, address: &str) -> Result<Option<String>> {
        let mut query = vec![
            ("chainid", chain_id.to_string()),
            ("module", "contract".to_string()),
            ("action", "getabi".to_string()),
            ("address", address.to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        let response = self
            .http
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            .context("Failed to query Etherscan API")?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), address, "etherscan lookup failed");
            return Ok(None);
        }

        let data: EtherscanResponse = response
            .json()
            .await
            .context("Failed to parse Etherscan response")?;
        Ok(abi_from_etherscan(data))
    }

    async fn lookup_sourcify(&self, chain_id: u64, address: &str) -> Result<Option<String>> {
        let url = format!(
            "https://sourcify.dev/server/v2/contract/{}/{}?fields=abi",
            chain_id, address
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to query Sourcify API")?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let data: SourcifyResponse = response
            .json()
            .await
            .context("Failed to parse Sourcify response")?;
        Ok(data.abi.map(|abi| abi.to_string()))
    }
}

#[async_trait::async_trait]
impl AbiSource for ExplorerClient {
    async fn contract_abi(&self, network: &Network, address: &str) -> Result<Option<String>> {
        let addr = address.to_lowercase();
        let cache_key = (network.chain_id, addr.clone());

        if let Some(abi) = self.cache.read().await.get(&cache_key) {
            return Ok(abi.clone());
        }

        let abi = match self.lookup_etherscan(network.chain_id, &addr).await {
            Ok(Some(abi)) => Some(abi),
            Ok(None) => self.lookup_sourcify(network.chain_id, &addr).await?,
            Err(err) => {
                tracing::debug!("etherscan error, trying sourcify: {err:#}");
                self.lookup_sourcify(network.chain_id, &addr).await?
            }
        };

        self.cache.write().await.insert(cache_key, abi.clone());
        Ok(abi)
    }
}

/// Etherscan returns the ABI as a JSON-encoded string in `result`
fn abi_from_etherscan(data: EtherscanResponse) -> Option<String> {
    if data.status != "1" {
        tracing::debug!(message = ?data.message, "etherscan returned no ABI");
        return None;
    }
    match &data.result {
        serde_json::Value::String(abi) if !abi.trim().is_empty() => Some(abi.clone()),
        serde_json::Value::Array(_) => Some(data.result.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> EtherscanResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_etherscan_ok() {
        let abi = abi_from_etherscan(response(serde_json::json!({
            "status": "1",
            "message": "OK",
            "result": "[{\"type\":\"function\",\"name\":\"x\"}]"
        })));
        assert_eq!(abi.as_deref(), Some("[{\"type\":\"function\",\"name\":\"x\"}]"));
    }

    #[test]
    fn test_etherscan_unverified() {
        let abi = abi_from_etherscan(response(serde_json::json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Contract source code not verified"
        })));
        assert!(abi.is_none());
    }

    #[test]
    fn test_etherscan_empty_result() {
        let abi = abi_from_etherscan(response(serde_json::json!({
            "status": "1",
            "result": ""
        })));
        assert!(abi.is_none());
    }
}
