//! Token panel: totals across accounts and an ERC-20 balance scan

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use anyhow::{bail, Context, Result};
use futures::future::join_all;

use crate::domain::{Account, AccountAsset, Asset, Network, DEFAULT_NETWORK};
use crate::infrastructure::ChainProvider;

/// Only this many known tokens are checked per account
pub const SCAN_ASSET_LIMIT: usize = 50;

sol! {
    interface IErc20 {
        function balanceOf(address owner) external view returns (uint256);
    }
}

/// Merge holdings of every account by asset name. Balances are summed and
/// the first occurrence decides the position.
pub fn aggregate_tokens(accounts: &[Account]) -> Vec<AccountAsset> {
    let mut totals: Vec<AccountAsset> = Vec::new();
    for held in accounts.iter().flat_map(|a| a.assets.iter()) {
        match totals.iter_mut().find(|t| t.asset.name == held.asset.name) {
            Some(total) => total.balance = total.balance.saturating_add(held.balance),
            None => totals.push(held.clone()),
        }
    }
    totals
}

#[async_trait::async_trait]
pub trait BalanceSource: Send + Sync {
    async fn token_balance(&self, owner: Address, asset: &Asset) -> Result<U256>;
}

/// Positive token balances found for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenScan {
    pub account: Address,
    pub balances: Vec<AccountAsset>,
}

/// Check every mainnet account against the first known tokens, keeping
/// non-zero balances. A token whose lookup fails is skipped.
pub async fn scan_tokens(
    accounts: &[Account],
    assets: &[Asset],
    source: &dyn BalanceSource,
) -> Vec<TokenScan> {
    let tokens: Vec<&Asset> = assets
        .iter()
        .filter(|asset| asset.is_token())
        .take(SCAN_ASSET_LIMIT)
        .collect();

    let scans = accounts
        .iter()
        .filter(|account| account.network_id == DEFAULT_NETWORK)
        .map(|account| scan_account(account.address, &tokens, source));
    join_all(scans).await
}

async fn scan_account(owner: Address, tokens: &[&Asset], source: &dyn BalanceSource) -> TokenScan {
    let lookups = tokens.iter().map(|asset| async move {
        match source.token_balance(owner, asset).await {
            Ok(balance) => Some(AccountAsset {
                asset: (*asset).clone(),
                balance,
            }),
            Err(err) => {
                tracing::debug!(%owner, token = %asset.symbol, "balance lookup failed: {err:#}");
                None
            }
        }
    });

    let balances = join_all(lookups)
        .await
        .into_iter()
        .flatten()
        .filter(|held| !held.balance.is_zero())
        .collect();
    TokenScan {
        account: owner,
        balances,
    }
}

/// Reads `balanceOf` through the chain provider
pub struct Erc20Balances {
    provider: Arc<dyn ChainProvider>,
    network: Network,
}

impl Erc20Balances {
    pub fn new(provider: Arc<dyn ChainProvider>, network: Network) -> Self {
        Self { provider, network }
    }
}

#[async_trait::async_trait]
impl BalanceSource for Erc20Balances {
    async fn token_balance(&self, owner: Address, asset: &Asset) -> Result<U256> {
        let Some(token) = asset.contract_address else {
            bail!("{} is not a token", asset.symbol);
        };
        let data = IErc20::balanceOfCall { owner }.abi_encode();
        let request = TransactionRequest::default().to(token).input(data.into());
        let output = self.provider.call(&self.network, request).await?;
        IErc20::balanceOfCall::abi_decode_returns(&output)
            .with_context(|| format!("Failed to decode balanceOf for {}", asset.symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WalletKind;

    fn token(symbol: &str, byte: u8) -> Asset {
        Asset {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            decimals: 18,
            contract_address: Some(Address::repeat_byte(byte)),
        }
    }

    fn account(byte: u8, network: &str, assets: Vec<AccountAsset>) -> Account {
        Account {
            label: format!("account {byte}"),
            address: Address::repeat_byte(byte),
            network_id: network.to_string(),
            wallet: WalletKind::ViewOnly,
            assets,
        }
    }

    fn held(asset: Asset, balance: u64) -> AccountAsset {
        AccountAsset {
            asset,
            balance: U256::from(balance),
        }
    }

    #[test]
    fn test_aggregate_sums_by_name() {
        let accounts = vec![
            account(1, "Ethereum", vec![held(token("DAI", 9), 5), held(Asset::ether(), 1)]),
            account(2, "Ethereum", vec![held(Asset::ether(), 2), held(token("DAI", 9), 7)]),
        ];
        let totals = aggregate_tokens(&accounts);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].asset.symbol, "DAI");
        assert_eq!(totals[0].balance, U256::from(12u64));
        assert_eq!(totals[1].balance, U256::from(3u64));
    }

    /// Balance equals the token's address byte, except token 0xee which fails
    struct Fixed;

    #[async_trait::async_trait]
    impl BalanceSource for Fixed {
        async fn token_balance(&self, _owner: Address, asset: &Asset) -> Result<U256> {
            let byte = asset.contract_address.map(|a| a[0]).unwrap_or_default();
            if byte == 0xee {
                bail!("rpc down");
            }
            Ok(U256::from(byte))
        }
    }

    #[tokio::test]
    async fn test_scan_keeps_positive_mainnet_balances() {
        let accounts = vec![account(1, "Ethereum", vec![]), account(2, "Sepolia", vec![])];
        let assets = vec![token("ZERO", 0), token("BAD", 0xee), token("OK", 4), Asset::ether()];

        let scans = scan_tokens(&accounts, &assets, &Fixed).await;
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].account, Address::repeat_byte(1));
        assert_eq!(scans[0].balances.len(), 1);
        assert_eq!(scans[0].balances[0].asset.symbol, "OK");
        assert_eq!(scans[0].balances[0].balance, U256::from(4u64));
    }

    #[tokio::test]
    async fn test_scan_limits_asset_count() {
        let accounts = vec![account(1, "Ethereum", vec![])];
        let assets: Vec<Asset> = (1..=60u8).map(|b| token(&format!("T{b}"), b)).collect();
        let scans = scan_tokens(&accounts, &assets, &Fixed).await;
        assert_eq!(scans[0].balances.len(), SCAN_ASSET_LIMIT);
    }
}
