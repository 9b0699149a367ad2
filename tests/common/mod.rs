//! In-process stand-ins for the chain, ENS and the ABI explorer

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use anyhow::{bail, Result};

use interact::config::builtin_networks;
use interact::domain::abi::parse_abi;
use interact::domain::{AbiFunctionCall, Account, Contract, ContractId, Network, WalletKind};
use interact::infrastructure::{AbiSource, ChainProvider, NameResolver, TxLookup};
use interact::modules::interact::{Collaborators, InteractWithContracts, InteractionState};
use interact::store::{ContractStore, NetworkRegistry, SqliteStore};

pub const TOKEN_ADDRESS: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
pub const CUSTOM_ADDRESS: &str = "0xccc4000000000000000000000000000000001234";

pub const ERC20_ABI: &str = r#"[
    {"type":"function","name":"balanceOf","stateMutability":"view",
     "inputs":[{"name":"owner","type":"address"}],
     "outputs":[{"name":"balance","type":"uint256"}]},
    {"type":"function","name":"transfer","stateMutability":"nonpayable",
     "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
     "outputs":[{"name":"","type":"bool"}]}
]"#;

pub const GAS_ESTIMATE: u64 = 50_000;
pub const NONCE: u64 = 7;

pub fn gas_price() -> U256 {
    U256::from(2_000_000_000u64)
}

#[derive(Default)]
pub struct FakeChain {
    pub call_output: Mutex<Bytes>,
    pub estimate_error: Mutex<Option<String>>,
    pub send_error: Mutex<Option<String>>,
    pub lookup: Mutex<Option<TxLookup>>,
    pub log: Mutex<Vec<&'static str>>,
}

impl FakeChain {
    pub fn calls(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl ChainProvider for FakeChain {
    async fn call(&self, _network: &Network, _request: TransactionRequest) -> Result<Bytes> {
        self.record("call");
        Ok(self.call_output.lock().unwrap().clone())
    }

    async fn estimate_gas(&self, _network: &Network, _request: TransactionRequest) -> Result<u64> {
        self.record("estimate_gas");
        if let Some(message) = self.estimate_error.lock().unwrap().clone() {
            bail!(message);
        }
        Ok(GAS_ESTIMATE)
    }

    async fn gas_price(&self, _network: &Network) -> Result<U256> {
        self.record("gas_price");
        Ok(gas_price())
    }

    async fn transaction_count(&self, _network: &Network, _address: Address) -> Result<u64> {
        self.record("transaction_count");
        Ok(NONCE)
    }

    async fn send_raw_transaction(&self, _network: &Network, signed: &[u8]) -> Result<B256> {
        self.record("send_raw_transaction");
        if let Some(message) = self.send_error.lock().unwrap().clone() {
            bail!(message);
        }
        Ok(keccak256(signed))
    }

    async fn transaction_by_hash(
        &self,
        _network: &Network,
        _hash: B256,
    ) -> Result<Option<TxLookup>> {
        self.record("transaction_by_hash");
        Ok(self.lookup.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeNames {
    pub records: Mutex<HashMap<String, Address>>,
    pub fail: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl NameResolver for FakeNames {
    async fn resolve_ens_address(
        &self,
        _network: &Network,
        domain: &str,
    ) -> Result<Option<Address>> {
        self.calls.lock().unwrap().push(domain.to_string());
        if *self.fail.lock().unwrap() {
            bail!("resolver unreachable");
        }
        Ok(self.records.lock().unwrap().get(domain).copied())
    }
}

#[derive(Default)]
pub struct FakeAbis {
    pub abis: Mutex<HashMap<String, String>>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl AbiSource for FakeAbis {
    async fn contract_abi(&self, _network: &Network, address: &str) -> Result<Option<String>> {
        let address = address.to_lowercase();
        self.calls.lock().unwrap().push(address.clone());
        Ok(self.abis.lock().unwrap().get(&address).cloned())
    }
}

/// Store wrapper whose writes can be switched to fail
pub struct FlakyStore {
    pub inner: Arc<SqliteStore>,
    fail_listing: AtomicBool,
    fail_deletes: AtomicBool,
    created: Mutex<Vec<ContractId>>,
}

impl FlakyStore {
    pub fn new(inner: Arc<SqliteStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_listing: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<ContractId> {
        self.created.lock().unwrap().clone()
    }
}

impl NetworkRegistry for FlakyStore {
    fn lookup_network(&self, id: &str) -> Result<Option<Network>> {
        self.inner.lookup_network(id)
    }

    fn networks(&self) -> Result<Vec<Network>> {
        self.inner.networks()
    }

    fn update_network_contracts(&self, id: &str, contracts: &[ContractId]) -> Result<()> {
        if self.fail_listing.load(Ordering::SeqCst) {
            bail!("network list is read-only");
        }
        self.inner.update_network_contracts(id, contracts)
    }
}

impl ContractStore for FlakyStore {
    fn get_contracts_by_ids(&self, ids: &[ContractId]) -> Result<Vec<Contract>> {
        self.inner.get_contracts_by_ids(ids)
    }

    fn create_contract(&self, contract: &Contract) -> Result<()> {
        self.created.lock().unwrap().push(contract.id);
        self.inner.create_contract(contract)
    }

    fn delete_contract(&self, id: ContractId) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            bail!("contract table is read-only");
        }
        self.inner.delete_contract(id)
    }
}

/// Fakes plus an in-memory store seeded with the built-in networks
pub struct Harness {
    pub store: Arc<SqliteStore>,
    pub chain: Arc<FakeChain>,
    pub names: Arc<FakeNames>,
    pub abis: Arc<FakeAbis>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(SqliteStore::open_in_memory(builtin_networks()).unwrap()),
            chain: Arc::new(FakeChain::default()),
            names: Arc::new(FakeNames::default()),
            abis: Arc::new(FakeAbis::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            networks: self.store.clone(),
            contracts: self.store.clone(),
            provider: self.chain.clone(),
            names: self.names.clone(),
            abis: self.abis.clone(),
        }
    }

    /// Session on Ethereum with the picker loaded
    pub fn session(&self) -> InteractWithContracts {
        let session = InteractWithContracts::new(self.collaborators(), InteractionState::default());
        session.select_network("Ethereum");
        session
    }

    /// Session on Ethereum whose storage goes through `store`
    pub fn session_over(&self, store: &Arc<FlakyStore>) -> InteractWithContracts {
        let mut deps = self.collaborators();
        deps.networks = store.clone();
        deps.contracts = store.clone();
        let session = InteractWithContracts::new(deps, InteractionState::default());
        session.select_network("Ethereum");
        session
    }

    pub fn register_domain(&self, domain: &str, address: Address) {
        self.names
            .records
            .lock()
            .unwrap()
            .insert(domain.to_string(), address);
    }

    pub fn publish_abi(&self, address: &str, abi: &str) {
        self.abis
            .abis
            .lock()
            .unwrap()
            .insert(address.to_lowercase(), abi.to_string());
    }

    pub fn resolved_domains(&self) -> Vec<String> {
        self.names.calls.lock().unwrap().clone()
    }

    pub fn abi_lookups(&self) -> Vec<String> {
        self.abis.calls.lock().unwrap().clone()
    }

    /// Store a contract and append it to a network's list
    pub fn seed_contract(&self, network: &str, name: &str, address: &str) -> Contract {
        let contract = Contract {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            address: address.to_string(),
            abi: ERC20_ABI.to_string(),
            network_id: network.to_string(),
        };
        self.store.create_contract(&contract).unwrap();
        let mut ids = self.store.lookup_network(network).unwrap().unwrap().contracts;
        ids.push(contract.id);
        self.store.update_network_contracts(network, &ids).unwrap();
        contract
    }
}

pub fn account(wallet: WalletKind) -> Account {
    Account {
        label: "main".to_string(),
        address: Address::repeat_byte(0x11),
        network_id: "Ethereum".to_string(),
        wallet,
        assets: Vec::new(),
    }
}

pub fn erc20_call(name: &str, args: &[&str]) -> AbiFunctionCall {
    let abi = parse_abi(ERC20_ABI).unwrap();
    let function = abi.function(name).unwrap()[0].clone();
    AbiFunctionCall::new(function, args.iter().map(|a| a.to_string()).collect())
}
