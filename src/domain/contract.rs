//! Saved contracts and the selectable contract list

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::network::NetworkId;

pub type ContractId = Uuid;

/// A contract the user saved (or that ships with a network)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub name: String,
    pub address: String,
    pub abi: String,
    pub network_id: NetworkId,
}

/// One entry of the contract picker. `Custom` stands for "enter address
/// and ABI by hand" and always heads the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractOption {
    Custom,
    Saved(Contract),
}

impl ContractOption {
    pub fn is_custom(&self) -> bool {
        matches!(self, ContractOption::Custom)
    }

    pub fn as_saved(&self) -> Option<&Contract> {
        match self {
            ContractOption::Custom => None,
            ContractOption::Saved(contract) => Some(contract),
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.as_saved().map(|c| c.address.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.as_saved().map(|c| c.name.as_str())
    }

    /// Case-insensitive address match; the custom entry matches nothing
    pub fn matches_address(&self, address: &str) -> bool {
        self.address()
            .map(|a| a.eq_ignore_ascii_case(address.trim()))
            .unwrap_or(false)
    }
}

/// Build the picker list: the custom entry followed by the saved contracts
pub fn contract_options(saved: Vec<Contract>) -> Vec<ContractOption> {
    std::iter::once(ContractOption::Custom)
        .chain(saved.into_iter().map(ContractOption::Saved))
        .collect()
}
