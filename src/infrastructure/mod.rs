//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based chain provider and ENS resolution
//! - Etherscan/Sourcify ABI lookup
//! - Tokio task helpers (debouncing)

pub mod abi;
pub mod ethereum;
pub mod runtime;

pub use abi::{AbiSource, ExplorerClient};
pub use ethereum::{AlloyChain, ChainProvider, EnsResolver, NameResolver, TxLookup};
pub use runtime::Debouncer;
