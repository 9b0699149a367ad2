//! Chain-agnostic views of RPC responses

use alloy::primitives::{Address, B256, U256};
use anyhow::{Context, Result};

use crate::domain::{TxReceipt, TxStatus};

/// Transaction found by hash, parsed from raw JSON so any EVM chain works
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxLookup {
    pub hash: B256,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: Option<U256>,
    pub nonce: u64,
    pub block_number: Option<u64>,
    pub status: TxStatus,
}

impl TxLookup {
    pub fn into_receipt(self) -> TxReceipt {
        TxReceipt {
            hash: format!("{:?}", self.hash),
            asset: None,
            from: self.from,
            to: self.to,
            value: self.value,
            gas_limit: Some(self.gas_limit),
            gas_price: self.gas_price,
            nonce: Some(self.nonce),
            status: self.status,
            block_number: self.block_number,
        }
    }
}

/// Parse an `eth_getTransactionByHash` result. Status starts out as
/// `Pending`, or `Unknown` once mined until a receipt says otherwise.
pub fn parse_tx_lookup(json: &serde_json::Value) -> Option<TxLookup> {
    let hash = json.get("hash")?.as_str()?.parse::<B256>().ok()?;
    let from = json
        .get("from")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<Address>().ok());
    let to = json
        .get("to")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<Address>().ok());

    let value = hex_field(json, "value")
        .and_then(|s| parse_hex_u256(s).ok())
        .unwrap_or(U256::ZERO);
    let gas_limit = hex_field(json, "gas")
        .and_then(|s| parse_hex_u64(s).ok())
        .unwrap_or(0);
    let gas_price = hex_field(json, "gasPrice").and_then(|s| parse_hex_u256(s).ok());
    let nonce = hex_field(json, "nonce")
        .and_then(|s| parse_hex_u64(s).ok())
        .unwrap_or(0);
    let block_number = hex_field(json, "blockNumber").and_then(|s| parse_hex_u64(s).ok());

    Some(TxLookup {
        hash,
        from,
        to,
        value,
        gas_limit,
        gas_price,
        nonce,
        block_number,
        status: if block_number.is_some() {
            TxStatus::Unknown
        } else {
            TxStatus::Pending
        },
    })
}

/// Map a receipt's `status` field
pub fn parse_receipt_status(json: &serde_json::Value) -> TxStatus {
    match hex_field(json, "status").and_then(|s| parse_hex_u64(s).ok()) {
        Some(1) => TxStatus::Success,
        Some(0) => TxStatus::Reverted,
        _ => TxStatus::Unknown,
    }
}

fn hex_field<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    json.get(key).and_then(|v| v.as_str())
}

/// Parse hex string to u64
pub fn parse_hex_u64(s: &str) -> Result<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).context("Failed to parse hex u64")
}

/// Parse hex string to U256
pub fn parse_hex_u256(s: &str) -> Result<U256> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() || s == "0" {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(s, 16).context("Failed to parse hex U256")
}
