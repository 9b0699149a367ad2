//! Dashboard panels backed by account data

mod tokens;

pub use tokens::{
    aggregate_tokens, scan_tokens, BalanceSource, Erc20Balances, TokenScan, SCAN_ASSET_LIMIT,
};
