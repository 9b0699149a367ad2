//! Transaction shapes across the write flow: raw fields, signable config,
//! sign result and receipt

use alloy_primitives::{Address, Bytes, U256};

use super::network::{Asset, NetworkId};

/// Gas fields the user may tweak before signing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransaction {
    pub gas_price: Option<U256>,
    pub gas_limit: Option<u64>,
    pub nonce: Option<u64>,
}

/// Partial update for [`RawTransaction`]; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasParams {
    pub gas_price: Option<U256>,
    pub gas_limit: Option<u64>,
    pub nonce: Option<u64>,
}

impl RawTransaction {
    pub fn merge(&mut self, params: GasParams) {
        if let Some(gas_price) = params.gas_price {
            self.gas_price = Some(gas_price);
        }
        if let Some(gas_limit) = params.gas_limit {
            self.gas_limit = Some(gas_limit);
        }
        if let Some(nonce) = params.nonce {
            self.nonce = Some(nonce);
        }
    }
}

/// Fully assembled transaction, ready for a signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfig {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub nonce: u64,
    pub chain_id: u64,
    pub network_id: NetworkId,
    pub asset: Asset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TxStatus {
    #[default]
    Pending,
    Success,
    Reverted,
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: String,
    pub asset: Option<Asset>,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<U256>,
    pub nonce: Option<u64>,
    pub status: TxStatus,
    pub block_number: Option<u64>,
}

impl TxReceipt {
    /// Pending receipt for a transaction built from `config`
    pub fn from_config(hash: impl Into<String>, config: &TxConfig) -> Self {
        Self {
            hash: hash.into(),
            asset: Some(config.asset.clone()),
            from: Some(config.from),
            to: Some(config.to),
            value: config.value,
            gas_limit: Some(config.gas_limit),
            gas_price: Some(config.gas_price),
            nonce: Some(config.nonce),
            status: TxStatus::Pending,
            block_number: None,
        }
    }
}

/// What a signing step hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignResult {
    /// The wallet broadcast the transaction itself
    Receipt(TxReceipt),
    /// Raw signed transaction bytes, still to be submitted
    Signed(Bytes),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_gas_params() {
        let mut raw = RawTransaction {
            gas_price: Some(U256::from(1u64)),
            gas_limit: Some(21_000),
            nonce: None,
        };
        raw.merge(GasParams {
            gas_limit: Some(50_000),
            nonce: Some(7),
            ..Default::default()
        });

        assert_eq!(raw.gas_price, Some(U256::from(1u64)));
        assert_eq!(raw.gas_limit, Some(50_000));
        assert_eq!(raw.nonce, Some(7));
    }
}
