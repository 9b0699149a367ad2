//! Persistent storage for saved contracts and per-network contract lists
//!
//! The interaction flow only sees the two traits below; `SqliteStore`
//! implements both on a single database file.

mod contracts;

use anyhow::Result;

use crate::domain::{Contract, ContractId, Network};

pub use contracts::SqliteStore;

/// Network lookup plus the per-network list of saved contract ids
pub trait NetworkRegistry: Send + Sync {
    fn lookup_network(&self, id: &str) -> Result<Option<Network>>;

    fn networks(&self) -> Result<Vec<Network>>;

    /// Replace the ordered contract id list of a network
    fn update_network_contracts(&self, id: &str, contracts: &[ContractId]) -> Result<()>;
}

pub trait ContractStore: Send + Sync {
    /// Contracts in the order of `ids`; unknown ids are skipped
    fn get_contracts_by_ids(&self, ids: &[ContractId]) -> Result<Vec<Contract>>;

    fn create_contract(&self, contract: &Contract) -> Result<()>;

    fn delete_contract(&self, id: ContractId) -> Result<()>;
}
