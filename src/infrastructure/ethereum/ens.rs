//! ENS name resolution over plain eth_call (EIP-137)

use std::sync::Arc;

use alloy::primitives::{keccak256, Address, B256};
use alloy::rpc::types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use anyhow::Result;

use super::provider::ChainProvider;
use crate::domain::Network;

sol! {
    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    interface IEnsResolver {
        function addr(bytes32 node) external view returns (address);
    }
}

/// Resolves human readable names to addresses
#[async_trait::async_trait]
pub trait NameResolver: Send + Sync + 'static {
    /// `Ok(None)` when the name has no resolver or no address record
    async fn resolve_ens_address(&self, network: &Network, domain: &str)
        -> Result<Option<Address>>;
}

/// ENS lookups through the network's registry contract
pub struct EnsResolver {
    provider: Arc<dyn ChainProvider>,
}

impl EnsResolver {
    pub fn new(provider: Arc<dyn ChainProvider>) -> Self {
        Self { provider }
    }

    async fn call_address(&self, network: &Network, to: Address, data: Vec<u8>) -> Result<Address> {
        let request = TransactionRequest::default().to(to).input(data.into());
        let output = self.provider.call(network, request).await?;
        Ok(decode_address_word(&output))
    }
}

#[async_trait::async_trait]
impl NameResolver for EnsResolver {
    async fn resolve_ens_address(
        &self,
        network: &Network,
        domain: &str,
    ) -> Result<Option<Address>> {
        let Some(registry) = network.ens_registry else {
            tracing::debug!(network = %network.id, "no ENS registry configured");
            return Ok(None);
        };

        let node = namehash(&domain.trim().to_ascii_lowercase());

        let resolver = self
            .call_address(network, registry, IEnsRegistry::resolverCall { node }.abi_encode())
            .await?;
        if resolver == Address::ZERO {
            return Ok(None);
        }

        let address = self
            .call_address(network, resolver, IEnsResolver::addrCall { node }.abi_encode())
            .await?;
        if address == Address::ZERO {
            return Ok(None);
        }
        Ok(Some(address))
    }
}

/// EIP-137 namehash
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }

    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }

    node
}

/// Last 20 bytes of the first return word; short output reads as zero
fn decode_address_word(output: &[u8]) -> Address {
    if output.len() < 32 {
        return Address::ZERO;
    }
    Address::from_slice(&output[12..32])
}
