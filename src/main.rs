use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use interact::config::{self, Config};
use interact::core::{Catalog, InteractError, Translator};
use interact::domain::abi::{parse_abi, read_functions};
use interact::domain::{is_valid_domain, AbiFunctionCall};
use interact::infrastructure::{AlloyChain, ChainProvider, EnsResolver, ExplorerClient};
use interact::modules::interact::{Collaborators, InteractWithContracts, InteractionState};
use interact::store::{NetworkRegistry, SqliteStore};

#[derive(Debug, Parser)]
#[command(
    name = "interact",
    version,
    about = "Interact with smart contracts: save contracts, resolve ENS names, call functions"
)]
struct Args {
    /// Config file; otherwise $INTERACT_CONFIG or the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List configured networks
    Networks,

    /// List saved contracts of a network
    Contracts {
        #[arg(long)]
        network: Option<String>,
    },

    /// Save a contract under a name
    Save {
        #[arg(long)]
        network: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        /// ABI JSON file; fetched from the explorer when omitted
        #[arg(long)]
        abi_file: Option<PathBuf>,
    },

    /// Delete a saved contract
    Delete {
        #[arg(long)]
        network: Option<String>,
        #[arg(long)]
        id: Uuid,
    },

    /// Call a read-only function and print its outputs
    Read {
        #[arg(long)]
        network: Option<String>,
        /// Contract address or ENS name
        #[arg(long)]
        target: String,
        #[arg(long)]
        abi_file: Option<PathBuf>,
        function: String,
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => config::parse(
            &fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => config::load(),
    };
    let catalog = Catalog::english();

    match run(args.command, &config).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<InteractError>().and_then(|e| e.validation()) {
            Some(validation) => bail!(catalog.translate(validation.message_key())),
            None => Err(err),
        },
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("INTERACT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Networks => {
            for network in config.networks() {
                println!(
                    "{:<12} chain {:<10} {} ({})",
                    network.id, network.chain_id, network.rpc, network.base_asset.symbol
                );
            }
            Ok(())
        }
        Command::Contracts { network } => {
            let session = open_session(config, network)?;
            for option in session.state().contracts {
                if let Some(contract) = option.as_saved() {
                    println!("{}  {:<24} {}", contract.id, contract.name, contract.address);
                }
            }
            Ok(())
        }
        Command::Save {
            network,
            name,
            address,
            abi_file,
        } => {
            let session = open_session(config, network)?;
            session.change_address_or_domain_input(&address).await;
            if let Some(path) = abi_file {
                session.change_abi(&read_abi(&path)?);
            }
            session.change_custom_contract_name(&name);
            let contract = session.save_contract_submit()?;
            println!("saved {} as {}", contract.name, contract.id);
            Ok(())
        }
        Command::Delete { network, id } => {
            let session = open_session(config, network)?;
            session.delete_contract(id)?;
            println!("deleted {id}");
            Ok(())
        }
        Command::Read {
            network,
            target,
            abi_file,
            function,
            args,
        } => {
            let session = open_session(config, network)?;
            session.change_address_or_domain_input(&target).await;
            if is_valid_domain(&target) {
                session.cancel_pending_resolution();
                session.resolve_address_from_domain(&target).await;
            }
            if let Some(path) = abi_file {
                session.change_abi(&read_abi(&path)?);
            }
            session
                .set_generated_form_visible(true)
                .map_err(InteractError::from)?;

            let call = build_call(&session.state().abi, &function, args)?;
            for output in session.submit_read_call(call).await? {
                println!("{} ({}) = {}", output.name, output.kind, output.value);
            }
            Ok(())
        }
    }
}

fn open_session(config: &Config, network: Option<String>) -> Result<InteractWithContracts> {
    let networks = config.networks();
    let store = Arc::new(match config::contracts_db_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            SqliteStore::open(&path, networks)?
        }
        None => SqliteStore::open_in_memory(networks)?,
    });

    let network_id = network.unwrap_or_else(|| config.default_network());
    if store.lookup_network(&network_id)?.is_none() {
        bail!("Unknown network: {network_id}");
    }

    let provider: Arc<dyn ChainProvider> = Arc::new(AlloyChain::new());
    let deps = Collaborators {
        networks: store.clone(),
        contracts: store,
        provider: provider.clone(),
        names: Arc::new(EnsResolver::new(provider)),
        abis: Arc::new(ExplorerClient::new(
            config.explorer_api(),
            config.etherscan_api_key.clone(),
        )?),
    };

    let session = InteractWithContracts::new(deps, InteractionState::new(network_id.clone()));
    session.select_network(&network_id);
    Ok(session)
}

fn read_abi(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read ABI from {}", path.display()))
}

/// Pick the overload of `name` taking as many inputs as were given
fn build_call(abi: &str, name: &str, args: Vec<String>) -> Result<AbiFunctionCall> {
    let abi = parse_abi(abi)?;
    let function = abi
        .function(name)
        .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == args.len()))
        .ok_or_else(|| {
            let available: Vec<&str> = read_functions(&abi)
                .into_iter()
                .map(|f| f.name.as_str())
                .collect();
            anyhow!(
                "No function {name} taking {} argument(s); read-only functions: {}",
                args.len(),
                available.join(", ")
            )
        })?;
    let call = AbiFunctionCall::new(function.clone(), args);
    if !call.is_read_only() {
        bail!("{name} modifies state; only read-only functions can be called here");
    }
    Ok(call)
}
