//! Ethereum infrastructure - Alloy provider and ENS resolution

mod ens;
mod provider;
pub(crate) mod types;

pub use ens::{namehash, EnsResolver, NameResolver};
pub use provider::{AlloyChain, ChainProvider};
pub use types::TxLookup;
