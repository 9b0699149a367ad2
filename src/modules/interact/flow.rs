//! The four-step interact wizard: form, confirm, sign, receipt
//!
//! Steps are rebuilt from the current record on every call, so what a
//! step shows is always a projection of [`InteractionState`].

use std::sync::Arc;

use super::machine::InteractWithContracts;
use super::state::InteractionState;
use super::wizard::Wizard;
use crate::core::{InteractResult, Navigator, Translator};
use crate::domain::{
    AbiFunctionCall, Account, ContractOption, NetworkId, RawTransaction, SignResult, SignStep,
    TxConfig, TxReceipt,
};

pub const STEP_COUNT: usize = 4;

/// What renders a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepComponent {
    Interact,
    InteractionConfirm,
    SignTransaction(SignStep),
    InteractionReceipt,
}

/// Slice of the record handed to a step
#[derive(Debug, Clone, PartialEq)]
pub enum StepProps {
    Interact {
        network_id: NetworkId,
        address_or_domain_input: String,
        contract_address: String,
        resolving_domain: bool,
        contract: Option<ContractOption>,
        contracts: Vec<ContractOption>,
        custom_contract_name: String,
        abi: String,
        show_generated_form: bool,
        account: Option<Account>,
        raw_transaction: RawTransaction,
    },
    Confirm {
        tx_config: Option<TxConfig>,
    },
    Sign {
        network_id: NetworkId,
        sender: Option<Account>,
        raw_transaction: RawTransaction,
    },
    Receipt {
        tx_config: Option<TxConfig>,
        tx_receipt: Option<TxReceipt>,
    },
}

/// Callbacks a step may trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    SelectNetwork,
    SelectContract,
    ChangeAddressOrDomain,
    ChangeAbi,
    ChangeCustomContractName,
    SaveContract,
    DeleteContract,
    SetGeneratedFormVisible,
    SubmitRead,
    SubmitWrite,
    SelectAccount,
    ChangeGasParams,
    GoToNextStep,
    SignSuccess,
    GoToFirstStep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,
    /// `None` when no account is selected on the sign step; render nothing
    pub component: Option<StepComponent>,
    pub props: StepProps,
    pub actions: Vec<StepAction>,
}

pub struct InteractFlow<N> {
    machine: InteractWithContracts,
    wizard: Wizard<N>,
    translator: Arc<dyn Translator>,
}

impl<N: Navigator> InteractFlow<N> {
    pub fn new(
        machine: InteractWithContracts,
        navigator: N,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            machine,
            wizard: Wizard::new(STEP_COUNT, navigator),
            translator,
        }
    }

    pub fn machine(&self) -> &InteractWithContracts {
        &self.machine
    }

    pub fn step_index(&self) -> usize {
        self.wizard.step()
    }

    /// (current, total) for the stepper, one-based
    pub fn stepper(&self) -> (usize, usize) {
        self.wizard.position()
    }

    pub fn steps(&self) -> Vec<Step> {
        let state = self.machine.state();
        (0..STEP_COUNT).map(|index| self.build_step(index, &state)).collect()
    }

    /// `None` only if the index ran past the last step
    pub fn current_step(&self) -> Option<Step> {
        let index = self.wizard.step();
        (index < STEP_COUNT).then(|| self.build_step(index, &self.machine.state()))
    }

    pub fn go_to_next_step(&mut self) {
        self.wizard.advance();
    }

    pub fn go_to_previous_step(&mut self) {
        self.wizard.retreat();
    }

    pub fn go_to_first_step(&mut self) {
        self.wizard.reset();
    }

    /// Prepare the transaction and move on to confirmation
    pub async fn submit_write(&mut self, call: AbiFunctionCall) -> InteractResult<()> {
        let wizard = &mut self.wizard;
        self.machine.submit_write_call(call, || wizard.advance()).await
    }

    /// Store the receipt and move on to the receipt step
    pub async fn sign_succeeded(&mut self, result: SignResult) {
        let wizard = &mut self.wizard;
        self.machine.handle_tx_signed(result, || wizard.advance()).await;
    }

    fn build_step(&self, index: usize, state: &InteractionState) -> Step {
        let t = |key: &str| self.translator.translate(key);
        match index {
            0 => Step {
                title: t("INTERACT_WITH_CONTRACTS"),
                component: Some(StepComponent::Interact),
                props: StepProps::Interact {
                    network_id: state.network_id.clone(),
                    address_or_domain_input: state.address_or_domain_input.clone(),
                    contract_address: state.contract_address.clone(),
                    resolving_domain: state.resolving_domain,
                    contract: state.contract.clone(),
                    contracts: state.contracts.clone(),
                    custom_contract_name: state.custom_contract_name.clone(),
                    abi: state.abi.clone(),
                    show_generated_form: state.show_generated_form,
                    account: state.account.clone(),
                    raw_transaction: state.raw_transaction.clone(),
                },
                actions: vec![
                    StepAction::SelectNetwork,
                    StepAction::SelectContract,
                    StepAction::ChangeAddressOrDomain,
                    StepAction::ChangeAbi,
                    StepAction::ChangeCustomContractName,
                    StepAction::SaveContract,
                    StepAction::DeleteContract,
                    StepAction::SetGeneratedFormVisible,
                    StepAction::SubmitRead,
                    StepAction::SubmitWrite,
                    StepAction::SelectAccount,
                    StepAction::ChangeGasParams,
                ],
            },
            1 => Step {
                title: t("CONFIRM_TRANSACTION"),
                component: Some(StepComponent::InteractionConfirm),
                props: StepProps::Confirm {
                    tx_config: state.tx_config.clone(),
                },
                actions: vec![StepAction::GoToNextStep],
            },
            2 => Step {
                title: t("SIGN_WRITE_TRANSACTION"),
                component: state
                    .account
                    .as_ref()
                    .and_then(|account| account.wallet.sign_step())
                    .map(StepComponent::SignTransaction),
                props: StepProps::Sign {
                    network_id: state.network_id.clone(),
                    sender: state.account.clone(),
                    raw_transaction: state.raw_transaction.clone(),
                },
                actions: vec![StepAction::SignSuccess],
            },
            _ => Step {
                title: t("INTERACTION_RECEIPT"),
                component: Some(StepComponent::InteractionReceipt),
                props: StepProps::Receipt {
                    tx_config: state.tx_config.clone(),
                    tx_receipt: state.tx_receipt.clone(),
                },
                actions: vec![StepAction::GoToFirstStep],
            },
        }
    }
}
