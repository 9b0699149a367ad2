//! Sending accounts and the wallet kinds that sign for them

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::network::{Asset, NetworkId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    MetaMask,
    Web3,
    Ledger,
    Trezor,
    Keystore,
    PrivateKey,
    Mnemonic,
    ViewOnly,
}

impl WalletKind {
    pub const ALL: [WalletKind; 8] = [
        WalletKind::MetaMask,
        WalletKind::Web3,
        WalletKind::Ledger,
        WalletKind::Trezor,
        WalletKind::Keystore,
        WalletKind::PrivateKey,
        WalletKind::Mnemonic,
        WalletKind::ViewOnly,
    ];

    /// Injected wallets sign and broadcast on their own and hand back a receipt
    pub fn is_local_signing(self) -> bool {
        matches!(self, WalletKind::MetaMask | WalletKind::Web3)
    }

    /// Signing step shown for this wallet, `None` when it cannot sign
    pub fn sign_step(self) -> Option<SignStep> {
        match self {
            WalletKind::MetaMask | WalletKind::Web3 => Some(SignStep::Web3),
            WalletKind::Ledger => Some(SignStep::Ledger),
            WalletKind::Trezor => Some(SignStep::Trezor),
            WalletKind::Keystore => Some(SignStep::Keystore),
            WalletKind::PrivateKey => Some(SignStep::PrivateKey),
            WalletKind::Mnemonic => Some(SignStep::Mnemonic),
            WalletKind::ViewOnly => None,
        }
    }
}

/// Signing screens, one per family of wallets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignStep {
    Web3,
    Ledger,
    Trezor,
    Keystore,
    PrivateKey,
    Mnemonic,
}

/// Balance of one asset held by an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountAsset {
    pub asset: Asset,
    pub balance: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub label: String,
    pub address: Address,
    pub network_id: NetworkId,
    pub wallet: WalletKind,
    pub assets: Vec<AccountAsset>,
}
