//! Domain models for the contract interaction flow
//!
//! Plain data plus the validators that guard it; no I/O lives here.

pub mod abi;
pub mod account;
pub mod address;
pub mod contract;
pub mod network;
pub mod transaction;

pub use abi::{AbiFunctionCall, DecodedArg};
pub use account::{Account, AccountAsset, SignStep, WalletKind};
pub use address::{is_valid_address, is_valid_domain, parse_address, ZERO_ADDRESS};
pub use contract::{contract_options, Contract, ContractId, ContractOption};
pub use network::{Asset, Network, NetworkId, DEFAULT_NETWORK, ENS_REGISTRY};
pub use transaction::{GasParams, RawTransaction, SignResult, TxConfig, TxReceipt, TxStatus};
