//! Chain provider abstraction and its Alloy implementation
//!
//! Every call names the network it targets; the Alloy implementation keeps
//! one lazily connected HTTP provider per network.

use std::collections::HashMap;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};
use tokio::sync::RwLock;

use super::types::{parse_receipt_status, parse_tx_lookup, TxLookup};
use crate::domain::{Network, NetworkId};

/// Chain operations the interaction flow needs
#[async_trait::async_trait]
pub trait ChainProvider: Send + Sync + 'static {
    /// Execute a call (eth_call)
    async fn call(&self, network: &Network, request: TransactionRequest) -> Result<Bytes>;

    async fn estimate_gas(&self, network: &Network, request: TransactionRequest) -> Result<u64>;

    async fn gas_price(&self, network: &Network) -> Result<U256>;

    /// Pending transaction count, used as the next nonce
    async fn transaction_count(&self, network: &Network, address: Address) -> Result<u64>;

    /// Broadcast a signed transaction, returning its hash
    async fn send_raw_transaction(&self, network: &Network, signed: &[u8]) -> Result<B256>;

    async fn transaction_by_hash(&self, network: &Network, hash: B256)
        -> Result<Option<TxLookup>>;
}

/// HTTP JSON-RPC providers keyed by network
#[derive(Default)]
pub struct AlloyChain {
    providers: RwLock<HashMap<NetworkId, DynProvider>>,
}

impl AlloyChain {
    pub fn new() -> Self {
        Self::default()
    }

    async fn provider(&self, network: &Network) -> Result<DynProvider> {
        if let Some(provider) = self.providers.read().await.get(&network.id) {
            return Ok(provider.clone());
        }

        let rpc_url = network
            .rpc
            .parse()
            .with_context(|| format!("Invalid HTTP URL for {}", network.id))?;
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        tracing::debug!(network = %network.id, rpc = %network.rpc, "provider connected");

        self.providers
            .write()
            .await
            .insert(network.id.clone(), provider.clone());
        Ok(provider)
    }
}

#[async_trait::async_trait]
impl ChainProvider for AlloyChain {
    async fn call(&self, network: &Network, request: TransactionRequest) -> Result<Bytes> {
        let provider = self.provider(network).await?;
        Ok(provider.call(request).await?)
    }

    async fn estimate_gas(&self, network: &Network, request: TransactionRequest) -> Result<u64> {
        let provider = self.provider(network).await?;
        Ok(provider.estimate_gas(request).await?)
    }

    async fn gas_price(&self, network: &Network) -> Result<U256> {
        let provider = self.provider(network).await?;
        Ok(U256::from(provider.get_gas_price().await?))
    }

    async fn transaction_count(&self, network: &Network, address: Address) -> Result<u64> {
        let provider = self.provider(network).await?;
        Ok(provider.get_transaction_count(address).pending().await?)
    }

    async fn send_raw_transaction(&self, network: &Network, signed: &[u8]) -> Result<B256> {
        let provider = self.provider(network).await?;
        let pending = provider.send_raw_transaction(signed).await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_by_hash(
        &self,
        network: &Network,
        hash: B256,
    ) -> Result<Option<TxLookup>> {
        let provider = self.provider(network).await?;

        // Raw JSON keeps non-standard L2 transaction types parseable
        let json: serde_json::Value = provider
            .raw_request("eth_getTransactionByHash".into(), (hash,))
            .await?;
        if json.is_null() {
            return Ok(None);
        }
        let Some(mut lookup) = parse_tx_lookup(&json) else {
            return Ok(None);
        };

        if lookup.block_number.is_some() {
            let receipt: serde_json::Value = provider
                .raw_request("eth_getTransactionReceipt".into(), (hash,))
                .await?;
            if !receipt.is_null() {
                lookup.status = parse_receipt_status(&receipt);
            }
        }

        Ok(Some(lookup))
    }
}
