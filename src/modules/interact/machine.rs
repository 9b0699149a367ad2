//! Handlers driving one interaction session
//!
//! Every handler applies its result with a single `send_modify`, so
//! subscribers never observe a half-applied update. Async handlers capture
//! the session generation when they start and drop their result if a later
//! network, contract or address change has bumped it in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use alloy::primitives::{keccak256, Address, Bytes, B256};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use anyhow::anyhow;
use tokio::sync::watch;

use super::state::{validate_contract_fields, InteractionState};
use crate::core::{InteractResult, ValidationError};
use crate::domain::{
    contract_options, is_valid_address, is_valid_domain, parse_address, AbiFunctionCall, Account,
    Contract, ContractId, ContractOption, DecodedArg, GasParams, Network, RawTransaction,
    SignResult, TxConfig, TxReceipt, TxStatus,
};
use crate::infrastructure::{AbiSource, ChainProvider, Debouncer, NameResolver};
use crate::store::{ContractStore, NetworkRegistry};

/// Quiet period before a typed ENS name is resolved
pub const DOMAIN_RESOLUTION_DELAY: Duration = Duration::from_millis(1500);

/// Services the session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub networks: Arc<dyn NetworkRegistry>,
    pub contracts: Arc<dyn ContractStore>,
    pub provider: Arc<dyn ChainProvider>,
    pub names: Arc<dyn NameResolver>,
    pub abis: Arc<dyn AbiSource>,
}

struct Inner {
    deps: Collaborators,
    state: watch::Sender<InteractionState>,
    generation: AtomicU64,
    resolver: Debouncer,
}

/// Cheap to clone; clones share the same session
#[derive(Clone)]
pub struct InteractWithContracts {
    inner: Arc<Inner>,
}

impl InteractWithContracts {
    pub fn new(deps: Collaborators, initial: InteractionState) -> Self {
        Self::with_resolution_delay(deps, initial, DOMAIN_RESOLUTION_DELAY)
    }

    pub fn with_resolution_delay(
        deps: Collaborators,
        initial: InteractionState,
        delay: Duration,
    ) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                deps,
                state,
                generation: AtomicU64::new(0),
                resolver: Debouncer::new(delay),
            }),
        }
    }

    /// Snapshot of the current record
    pub fn state(&self) -> InteractionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InteractionState> {
        self.inner.state.subscribe()
    }

    /// True while a typed domain is waiting out the quiet period
    pub fn resolution_pending(&self) -> bool {
        self.inner.resolver.is_pending()
    }

    /// Drop a scheduled domain resolution that has not fired yet
    pub fn cancel_pending_resolution(&self) {
        self.inner.resolver.cancel();
    }

    // ------------------------------------------------------------------
    // Network and contract selection
    // ------------------------------------------------------------------

    pub fn select_network(&self, network_id: &str) {
        self.inner.resolver.cancel();
        let contracts = self
            .contract_options_for(network_id)
            .unwrap_or_else(|| vec![ContractOption::Custom]);

        self.update(|s| {
            self.bump_generation();
            s.network_id = network_id.to_string();
            s.contracts = contracts;
            s.contract = None;
            s.contract_address.clear();
            s.address_or_domain_input.clear();
            s.abi.clear();
            s.custom_contract_name.clear();
            s.resolving_domain = false;
            s.show_generated_form = false;
        });
        tracing::debug!(network = network_id, "network selected");
    }

    /// Refresh the picker from storage; a failed lookup leaves it as is
    pub fn load_contract_options(&self, network_id: &str) {
        if let Some(contracts) = self.contract_options_for(network_id) {
            self.update(|s| s.contracts = contracts);
        }
    }

    pub fn select_contract(&self, option: ContractOption) {
        self.inner.resolver.cancel();
        self.update(|s| {
            self.bump_generation();
            s.apply_selection(option);
        });
    }

    // ------------------------------------------------------------------
    // Address, domain and ABI input
    // ------------------------------------------------------------------

    /// Typing into the address box. A saved contract's address selects that
    /// contract; a domain is resolved after a quiet period; a plain address
    /// triggers an ABI lookup right away.
    pub async fn change_address_or_domain_input(&self, text: &str) {
        let existing = self.state().existing_contract(text).cloned();
        if let Some(existing) = existing {
            self.select_contract(existing);
            return;
        }

        let is_domain = is_valid_domain(text);
        let is_address = !is_domain && is_valid_address(text.trim());

        self.inner.resolver.cancel();
        self.update(|s| {
            self.bump_generation();
            s.address_or_domain_input = text.to_string();
            s.contract_address = if is_domain {
                String::new()
            } else {
                text.trim().to_string()
            };
            s.contract = Some(ContractOption::Custom);
            s.abi.clear();
            s.resolving_domain = false;
            s.show_generated_form = false;
        });

        if is_domain {
            let session = Arc::downgrade(&self.inner);
            let domain = text.to_string();
            self.inner.resolver.schedule(async move {
                if let Some(this) = Self::upgrade(&session) {
                    this.resolve_address_from_domain(&domain).await;
                }
            });
        } else if is_address {
            self.fetch_abi(text.trim()).await;
        }
    }

    /// Resolve `domain` on the current network. An unregistered name maps to
    /// the zero address; a failed lookup leaves the address untouched.
    pub async fn resolve_address_from_domain(&self, domain: &str) {
        let generation = self.generation();
        if !self.update_if_current(generation, |s| s.resolving_domain = true) {
            return;
        }

        let resolved = match self.current_network() {
            Some(network) => self
                .inner
                .deps
                .names
                .resolve_ens_address(&network, domain)
                .await
                .map(|address| address.unwrap_or(Address::ZERO)),
            None => Err(anyhow!("network is not registered")),
        };

        let address = match resolved {
            Ok(address) => address.to_checksum(None),
            Err(err) => {
                tracing::warn!(domain, "ENS resolution failed: {err:#}");
                self.update_if_current(generation, |s| s.resolving_domain = false);
                return;
            }
        };
        tracing::debug!(domain, %address, "domain resolved");

        let existing = self
            .state()
            .existing_contract(&address)
            .and_then(|c| c.as_saved())
            .cloned();
        let known = existing.is_some();

        let applied = self.update_if_current(generation, |s| {
            s.contract_address = address.clone();
            s.resolving_domain = false;
            if let Some(contract) = existing {
                s.abi = contract.abi;
            }
        });

        if applied && !known {
            self.fetch_abi(&address).await;
        }
    }

    /// Look up a verified ABI; anything but a non-empty result is ignored
    pub async fn fetch_abi(&self, address: &str) {
        let generation = self.generation();
        let Some(network) = self.current_network() else {
            return;
        };

        match self.inner.deps.abis.contract_abi(&network, address).await {
            Ok(Some(abi)) if !abi.trim().is_empty() => {
                if !self.update_if_current(generation, |s| s.abi = abi) {
                    tracing::debug!(address, "discarding ABI for a stale address");
                }
            }
            Ok(_) => tracing::debug!(address, "no verified ABI"),
            Err(err) => tracing::warn!(address, "ABI lookup failed: {err:#}"),
        }
    }

    pub fn change_abi(&self, text: &str) {
        self.update(|s| {
            s.abi = text.to_string();
            s.show_generated_form = false;
        });
    }

    pub fn change_custom_contract_name(&self, text: &str) {
        self.update(|s| s.custom_contract_name = text.to_string());
    }

    // ------------------------------------------------------------------
    // Saved contracts
    // ------------------------------------------------------------------

    /// Persist the custom contract, append it to the network and select it
    pub fn save_contract_submit(&self) -> InteractResult<Contract> {
        let state = self.state();
        let name = state.custom_contract_name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingData.into());
        }
        validate_contract_fields(&state.contract_address, &state.abi)?;
        if state.has_contract_named(name) {
            return Err(ValidationError::DuplicateName.into());
        }

        let network = self.require_network(&state.network_id)?;
        let contract = Contract {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            address: state.contract_address.trim().to_string(),
            abi: state.abi.clone(),
            network_id: network.id.clone(),
        };

        self.inner.deps.contracts.create_contract(&contract)?;
        let mut ids = network.contracts.clone();
        ids.push(contract.id);
        if let Err(err) = self
            .inner
            .deps
            .networks
            .update_network_contracts(&network.id, &ids)
        {
            if let Err(undo) = self.inner.deps.contracts.delete_contract(contract.id) {
                tracing::warn!(
                    id = %contract.id,
                    error = %undo,
                    "failed to remove unlisted contract"
                );
            }
            return Err(err.into());
        }
        tracing::info!(name = %contract.name, network = %network.id, "contract saved");

        let contracts = self
            .contract_options_for(&network.id)
            .unwrap_or_else(|| {
                let mut options = state.contracts.clone();
                options.push(ContractOption::Saved(contract.clone()));
                options
            });

        self.inner.resolver.cancel();
        let selected = ContractOption::Saved(contract.clone());
        self.update(|s| {
            self.bump_generation();
            s.contracts = contracts;
            s.custom_contract_name.clear();
            s.apply_selection(selected);
        });
        Ok(contract)
    }

    /// Remove a saved contract and fall back to the custom entry
    pub fn delete_contract(&self, id: ContractId) -> InteractResult<()> {
        let network_id = self.state().network_id;
        let network = self.require_network(&network_id)?;

        let ids: Vec<ContractId> = network
            .contracts
            .iter()
            .copied()
            .filter(|existing| *existing != id)
            .collect();
        self.inner
            .deps
            .networks
            .update_network_contracts(&network.id, &ids)?;
        if let Err(err) = self.inner.deps.contracts.delete_contract(id) {
            // The row survived, so it stays listed
            if let Err(undo) = self
                .inner
                .deps
                .networks
                .update_network_contracts(&network.id, &network.contracts)
            {
                tracing::warn!(%id, error = %undo, "failed to relist contract");
            }
            return Err(err.into());
        }
        tracing::info!(%id, network = %network.id, "contract deleted");

        let contracts = self
            .contract_options_for(&network.id)
            .unwrap_or_else(|| vec![ContractOption::Custom]);

        self.inner.resolver.cancel();
        self.update(|s| {
            self.bump_generation();
            s.contracts = contracts;
            s.apply_selection(ContractOption::Custom);
        });
        Ok(())
    }

    /// Showing the function form needs a valid address and ABI; hiding never fails
    pub fn set_generated_form_visible(&self, visible: bool) -> Result<(), ValidationError> {
        if visible {
            let state = self.state();
            validate_contract_fields(&state.contract_address, &state.abi)?;
        }
        self.update(|s| s.show_generated_form = visible);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Calls and transactions
    // ------------------------------------------------------------------

    /// Execute a read-only call against the selected contract
    pub async fn submit_read_call(
        &self,
        call: AbiFunctionCall,
    ) -> InteractResult<Vec<DecodedArg>> {
        let state = self.state();
        let to = parse_address(state.contract_address.trim())
            .ok_or(ValidationError::InvalidAddress)?;
        let network = self.require_network(&state.network_id)?;

        let data = Bytes::from(call.encode()?);
        let mut request = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(data));
        if let Some(account) = &state.account {
            request = request.from(account.address);
        }

        let output = self.inner.deps.provider.call(&network, request).await?;
        let decoded = call.decode_output(&output)?;
        tracing::debug!(function = %call.function.name, outputs = decoded.len(), "read call");

        self.update(|s| s.submitted_function = Some(call));
        Ok(decoded)
    }

    /// Build a signable transaction. Gas is estimated first so a call that
    /// would revert fails here and `on_success` is never invoked.
    pub async fn submit_write_call<F>(
        &self,
        call: AbiFunctionCall,
        on_success: F,
    ) -> InteractResult<()>
    where
        F: FnOnce(),
    {
        let state = self.state();
        let account = state.account.clone().ok_or(ValidationError::MissingAccount)?;
        let to = parse_address(state.contract_address.trim())
            .ok_or(ValidationError::InvalidAddress)?;
        let network = self.require_network(&state.network_id)?;
        let provider = &self.inner.deps.provider;

        let data = Bytes::from(call.encode()?);
        let request = TransactionRequest::default()
            .from(account.address)
            .to(to)
            .value(call.value)
            .input(TransactionInput::new(data.clone()));

        let estimate = provider.estimate_gas(&network, request).await?;
        let raw = &state.raw_transaction;
        let gas_limit = raw.gas_limit.unwrap_or(estimate);
        let gas_price = match raw.gas_price {
            Some(price) => price,
            None => provider.gas_price(&network).await?,
        };
        let nonce = match raw.nonce {
            Some(nonce) => nonce,
            None => provider.transaction_count(&network, account.address).await?,
        };

        let tx_config = TxConfig {
            from: account.address,
            to,
            data,
            value: call.value,
            gas_limit,
            gas_price,
            nonce,
            chain_id: network.chain_id,
            network_id: network.id.clone(),
            asset: network.base_asset.clone(),
        };
        tracing::info!(
            function = %call.function.name,
            gas_limit,
            nonce,
            "write transaction prepared"
        );

        self.update(|s| {
            s.submitted_function = Some(call);
            s.raw_transaction = RawTransaction {
                gas_price: Some(gas_price),
                gas_limit: Some(gas_limit),
                nonce: Some(nonce),
            };
            s.tx_config = Some(tx_config);
            s.tx_receipt = None;
        });
        on_success();
        Ok(())
    }

    pub fn select_account(&self, account: Option<Account>) {
        self.update(|s| s.account = account);
    }

    /// Turn a signing result into a receipt, then call `on_success` once.
    /// Injected wallets already broadcast; anything else is submitted here,
    /// falling back to a lookup by hash if the broadcast errors.
    pub async fn handle_tx_signed<F>(&self, result: SignResult, on_success: F)
    where
        F: FnOnce(),
    {
        let state = self.state();
        let Some(account) = state.account.as_ref() else {
            tracing::warn!("signed transaction without a selected account");
            return;
        };

        let receipt = match result {
            SignResult::Receipt(receipt) => receipt,
            SignResult::Signed(signed) if account.wallet.is_local_signing() => {
                receipt_for(keccak256(&signed), state.tx_config.as_ref())
            }
            SignResult::Signed(signed) => self.broadcast(&state, account, &signed).await,
        };
        tracing::info!(hash = %receipt.hash, status = ?receipt.status, "transaction receipt");

        self.update(|s| s.tx_receipt = Some(receipt));
        on_success();
    }

    /// Merge user edits into the pending gas fields
    pub fn change_gas_params(&self, params: GasParams) {
        self.update(|s| s.raw_transaction.merge(params));
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn broadcast(
        &self,
        state: &InteractionState,
        account: &Account,
        signed: &[u8],
    ) -> TxReceipt {
        let config = state.tx_config.as_ref();
        let local_hash = keccak256(signed);
        let network_id = config
            .map(|c| c.network_id.as_str())
            .unwrap_or(account.network_id.as_str());

        let Some(network) = self.lookup_network(network_id) else {
            return unknown_receipt(local_hash, config);
        };
        let provider = &self.inner.deps.provider;

        match provider.send_raw_transaction(&network, signed).await {
            Ok(hash) => receipt_for(hash, config),
            Err(err) => {
                tracing::warn!(hash = %local_hash, "broadcast failed, looking up by hash: {err:#}");
                match provider.transaction_by_hash(&network, local_hash).await {
                    Ok(Some(lookup)) => {
                        let mut receipt = lookup.into_receipt();
                        receipt.asset = Some(network.base_asset.clone());
                        receipt
                    }
                    Ok(None) => unknown_receipt(local_hash, config),
                    Err(err) => {
                        tracing::warn!(hash = %local_hash, "lookup failed: {err:#}");
                        unknown_receipt(local_hash, config)
                    }
                }
            }
        }
    }

    fn upgrade(session: &Weak<Inner>) -> Option<Self> {
        session.upgrade().map(|inner| Self { inner })
    }

    fn update(&self, apply: impl FnOnce(&mut InteractionState)) {
        self.inner.state.send_modify(apply);
    }

    /// Apply only if no newer selection happened since `generation` was read
    fn update_if_current(
        &self,
        generation: u64,
        apply: impl FnOnce(&mut InteractionState),
    ) -> bool {
        self.inner.state.send_if_modified(|s| {
            if self.generation() != generation {
                return false;
            }
            apply(s);
            true
        })
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn lookup_network(&self, id: &str) -> Option<Network> {
        match self.inner.deps.networks.lookup_network(id) {
            Ok(network) => network,
            Err(err) => {
                tracing::warn!(network = id, "network lookup failed: {err:#}");
                None
            }
        }
    }

    fn current_network(&self) -> Option<Network> {
        let id = self.inner.state.borrow().network_id.clone();
        self.lookup_network(&id)
    }

    fn require_network(&self, id: &str) -> anyhow::Result<Network> {
        self.inner
            .deps
            .networks
            .lookup_network(id)?
            .ok_or_else(|| anyhow!("Unknown network: {id}"))
    }

    fn contract_options_for(&self, network_id: &str) -> Option<Vec<ContractOption>> {
        let network = self.lookup_network(network_id)?;
        match self.inner.deps.contracts.get_contracts_by_ids(&network.contracts) {
            Ok(saved) => Some(contract_options(saved)),
            Err(err) => {
                tracing::warn!(network = network_id, "failed to load contracts: {err:#}");
                None
            }
        }
    }
}

fn receipt_for(hash: B256, config: Option<&TxConfig>) -> TxReceipt {
    let hash = format!("{hash:?}");
    match config {
        Some(config) => TxReceipt::from_config(hash, config),
        None => TxReceipt {
            hash,
            ..TxReceipt::default()
        },
    }
}

fn unknown_receipt(hash: B256, config: Option<&TxConfig>) -> TxReceipt {
    TxReceipt {
        status: TxStatus::Unknown,
        ..receipt_for(hash, config)
    }
}
