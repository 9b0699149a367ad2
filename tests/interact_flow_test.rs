//! Wizard steps of the interact flow

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use alloy::primitives::Bytes;

use common::*;
use interact::core::{Catalog, Navigator, Route};
use interact::domain::{SignResult, SignStep, TxStatus, WalletKind};
use interact::modules::interact::{InteractFlow, StepAction, StepComponent, StepProps};

#[derive(Clone, Default)]
struct RecordingNavigator(Rc<RefCell<Vec<Route>>>);

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.0.borrow_mut().push(route);
    }
}

fn new_flow(harness: &Harness) -> (InteractFlow<RecordingNavigator>, RecordingNavigator) {
    let navigator = RecordingNavigator::default();
    let flow = InteractFlow::new(
        harness.session(),
        navigator.clone(),
        Arc::new(Catalog::english()),
    );
    (flow, navigator)
}

#[test]
fn test_back_from_first_step_goes_to_dashboard() {
    let harness = Harness::new();
    let (mut flow, navigator) = new_flow(&harness);

    flow.go_to_previous_step();

    assert_eq!(flow.step_index(), 0);
    assert_eq!(*navigator.0.borrow(), vec![Route::Dashboard]);
}

#[test]
fn test_step_titles_and_stepper() {
    let harness = Harness::new();
    let (mut flow, _) = new_flow(&harness);

    let titles: Vec<String> = flow.steps().into_iter().map(|s| s.title).collect();
    assert_eq!(
        titles,
        vec![
            "Interact with Contracts",
            "Confirm Transaction",
            "Sign write transaction",
            "Interaction Receipt",
        ]
    );
    assert_eq!(flow.stepper(), (1, 4));

    flow.go_to_next_step();
    assert_eq!(flow.stepper(), (2, 4));
    flow.go_to_previous_step();
    assert_eq!(flow.step_index(), 0);
}

#[test]
fn test_sign_step_without_account_has_no_component() {
    let harness = Harness::new();
    let (mut flow, _) = new_flow(&harness);
    flow.go_to_next_step();
    flow.go_to_next_step();

    let step = flow.current_step().expect("sign step");
    assert_eq!(step.title, "Sign write transaction");
    assert!(step.component.is_none());
    assert!(matches!(step.props, StepProps::Sign { sender: None, .. }));
}

#[test]
fn test_sign_step_follows_wallet_kind() {
    let harness = Harness::new();
    let (flow, _) = new_flow(&harness);

    let cases = [
        (WalletKind::MetaMask, Some(SignStep::Web3)),
        (WalletKind::Trezor, Some(SignStep::Trezor)),
        (WalletKind::Mnemonic, Some(SignStep::Mnemonic)),
        (WalletKind::ViewOnly, None),
    ];
    for (wallet, expected) in cases {
        flow.machine().select_account(Some(account(wallet)));
        let steps = flow.steps();
        let sign = &steps[2];
        assert_eq!(
            sign.component,
            expected.map(StepComponent::SignTransaction),
            "{wallet:?}"
        );
    }
}

#[test]
fn test_receipt_step_returns_to_start() {
    let harness = Harness::new();
    let (mut flow, _) = new_flow(&harness);

    let steps = flow.steps();
    let receipt = &steps[3];
    assert_eq!(receipt.actions, vec![StepAction::GoToFirstStep]);

    for _ in 0..3 {
        flow.go_to_next_step();
    }
    let current = flow.current_step().map(|s| s.title);
    assert_eq!(current.as_deref(), Some("Interaction Receipt"));
    flow.go_to_first_step();
    assert_eq!(flow.step_index(), 0);
}

#[tokio::test]
async fn test_write_then_sign_walks_the_wizard() {
    let harness = Harness::new();
    let (mut flow, _) = new_flow(&harness);
    flow.machine()
        .change_address_or_domain_input(TOKEN_ADDRESS)
        .await;
    flow.machine().select_account(Some(account(WalletKind::Keystore)));

    flow.submit_write(erc20_call("transfer", &[CUSTOM_ADDRESS, "5"]))
        .await
        .unwrap();
    assert_eq!(flow.step_index(), 1);
    let confirm = flow.current_step().expect("confirm step");
    match confirm.props {
        StepProps::Confirm { tx_config: Some(tx) } => assert_eq!(tx.nonce, NONCE),
        other => panic!("unexpected props {other:?}"),
    }

    flow.go_to_next_step();
    let sign = flow.current_step().expect("sign step");
    assert_eq!(sign.component, Some(StepComponent::SignTransaction(SignStep::Keystore)));

    flow.sign_succeeded(SignResult::Signed(Bytes::from_static(&[0xf8, 0x01])))
        .await;
    assert_eq!(flow.step_index(), 3);
    match flow.current_step().expect("receipt step").props {
        StepProps::Receipt {
            tx_receipt: Some(receipt),
            ..
        } => assert_eq!(receipt.status, TxStatus::Pending),
        other => panic!("unexpected props {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_write_stays_on_form() {
    let harness = Harness::new();
    let (mut flow, _) = new_flow(&harness);
    flow.machine()
        .change_address_or_domain_input(TOKEN_ADDRESS)
        .await;

    let result = flow
        .submit_write(erc20_call("transfer", &[CUSTOM_ADDRESS, "5"]))
        .await;

    assert!(result.is_err());
    assert_eq!(flow.step_index(), 0);
}
