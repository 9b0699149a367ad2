//! Networks and their native assets

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

use super::contract::ContractId;

pub type NetworkId = String;

/// Network selected when a wizard session starts
pub const DEFAULT_NETWORK: &str = "Ethereum";

/// ENS registry deployed at the same address on mainnet and the public testnets
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    /// Token contract, `None` for the network's base asset
    #[serde(default)]
    pub contract_address: Option<Address>,
}

impl Asset {
    pub fn ether() -> Self {
        Self {
            symbol: "ETH".to_string(),
            name: "Ether".to_string(),
            decimals: 18,
            contract_address: None,
        }
    }

    pub fn is_token(&self) -> bool {
        self.contract_address.is_some()
    }

    /// Render a raw amount with this asset's decimals
    pub fn format_amount(&self, value: U256) -> String {
        if self.decimals == 0 {
            return value.to_string();
        }

        let divisor = U256::from(10u64).pow(U256::from(self.decimals));
        let whole = value / divisor;
        let frac = value % divisor;
        if frac.is_zero() {
            return whole.to_string();
        }

        let frac = format!("{:0>width$}", frac.to_string(), width = self.decimals as usize);
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    pub chain_id: u64,
    pub rpc: String,
    pub ens_registry: Option<Address>,
    pub base_asset: Asset,
    /// Saved contracts visible on this network, in display order
    pub contracts: Vec<ContractId>,
}

impl Network {
    pub fn supports_ens(&self) -> bool {
        self.ens_registry.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        let eth = Asset::ether();
        assert_eq!(eth.format_amount(U256::ZERO), "0");
        assert_eq!(
            eth.format_amount(U256::from(1_500_000_000_000_000_000u128)),
            "1.5"
        );
        assert_eq!(eth.format_amount(U256::from(1u64)), "0.000000000000000001");

        let raw = Asset {
            decimals: 0,
            ..Asset::ether()
        };
        assert_eq!(raw.format_amount(U256::from(42u64)), "42");
    }
}
