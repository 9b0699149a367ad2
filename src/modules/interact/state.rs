//! The interaction record and the checks that gate it

use crate::core::ValidationError;
use crate::domain::abi::is_valid_abi_json;
use crate::domain::{
    is_valid_address, AbiFunctionCall, Account, ContractOption, NetworkId, RawTransaction,
    TxConfig, TxReceipt, DEFAULT_NETWORK,
};

/// Everything one wizard session knows. Only the handlers on
/// [`super::InteractWithContracts`] change it.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub network_id: NetworkId,
    /// Raw user text: an address or an ENS name
    pub address_or_domain_input: String,
    /// Resolved hex address, empty until known
    pub contract_address: String,
    /// True only while an ENS lookup is in flight
    pub resolving_domain: bool,
    pub contract: Option<ContractOption>,
    /// Picker entries for the network, custom entry first
    pub contracts: Vec<ContractOption>,
    pub custom_contract_name: String,
    pub abi: String,
    pub show_generated_form: bool,
    pub submitted_function: Option<AbiFunctionCall>,
    pub raw_transaction: RawTransaction,
    pub account: Option<Account>,
    pub tx_config: Option<TxConfig>,
    pub tx_receipt: Option<TxReceipt>,
}

impl InteractionState {
    pub fn new(network_id: impl Into<NetworkId>) -> Self {
        Self {
            network_id: network_id.into(),
            address_or_domain_input: String::new(),
            contract_address: String::new(),
            resolving_domain: false,
            contract: None,
            contracts: vec![ContractOption::Custom],
            custom_contract_name: String::new(),
            abi: String::new(),
            show_generated_form: false,
            submitted_function: None,
            raw_transaction: RawTransaction::default(),
            account: None,
            tx_config: None,
            tx_receipt: None,
        }
    }

    /// Saved contract whose address equals `address`, ignoring case
    pub fn existing_contract(&self, address: &str) -> Option<&ContractOption> {
        self.contracts.iter().find(|c| c.matches_address(address))
    }

    pub fn has_contract_named(&self, name: &str) -> bool {
        let name = name.trim();
        self.contracts
            .iter()
            .filter_map(|c| c.name())
            .any(|existing| existing.trim().eq_ignore_ascii_case(name))
    }

    /// Point the record at `option`, keeping input and address in step
    pub(crate) fn apply_selection(&mut self, option: ContractOption) {
        match &option {
            ContractOption::Saved(contract) => {
                self.contract_address = contract.address.clone();
                self.address_or_domain_input = contract.address.clone();
                self.abi = contract.abi.clone();
            }
            ContractOption::Custom => {
                self.contract_address.clear();
                self.address_or_domain_input.clear();
                self.abi.clear();
            }
        }
        self.contract = Some(option);
        self.resolving_domain = false;
        self.show_generated_form = false;
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(DEFAULT_NETWORK)
    }
}

/// Address and ABI must both be present, well-formed and parseable
pub fn validate_contract_fields(address: &str, abi: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() || abi.trim().is_empty() {
        return Err(ValidationError::MissingData);
    }
    if !is_valid_address(address.trim()) {
        return Err(ValidationError::InvalidAddress);
    }
    if !is_valid_abi_json(abi) {
        return Err(ValidationError::MalformedAbi);
    }
    Ok(())
}
