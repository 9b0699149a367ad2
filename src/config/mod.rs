use std::fs;
use std::path::PathBuf;

use alloy_primitives::Address;
use serde::Deserialize;

use crate::domain::{Asset, Network, DEFAULT_NETWORK, ENS_REGISTRY};

pub const DEFAULT_EXPLORER_API: &str = "https://api.etherscan.io/v2/api";

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub id: String,
    pub name: Option<String>,
    pub chain_id: u64,
    pub rpc: String,
    pub ens_registry: Option<Address>,
    pub base_asset: Option<Asset>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub default_network: Option<String>,

    pub etherscan_api_key: Option<String>,

    pub explorer_api: Option<String>,

    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
}

impl NetworkConfig {
    pub fn to_network(&self) -> Network {
        Network {
            id: self.id.clone(),
            name: self
                .name
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| self.id.clone()),
            chain_id: self.chain_id,
            rpc: self.rpc.clone(),
            ens_registry: self.ens_registry,
            base_asset: self.base_asset.clone().unwrap_or_else(Asset::ether),
            contracts: Vec::new(),
        }
    }
}

impl Config {
    pub fn default_network(&self) -> String {
        self.default_network
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string())
    }

    pub fn explorer_api(&self) -> String {
        self.explorer_api
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPLORER_API.to_string())
    }

    /// Configured networks, or the built-in ones when none are configured
    pub fn networks(&self) -> Vec<Network> {
        if self.networks.is_empty() {
            return builtin_networks();
        }
        self.networks.iter().map(NetworkConfig::to_network).collect()
    }
}

pub fn builtin_networks() -> Vec<Network> {
    vec![
        Network {
            id: "Ethereum".to_string(),
            name: "Ethereum".to_string(),
            chain_id: 1,
            rpc: "https://ethereum-rpc.publicnode.com".to_string(),
            ens_registry: Some(ENS_REGISTRY),
            base_asset: Asset::ether(),
            contracts: Vec::new(),
        },
        Network {
            id: "Sepolia".to_string(),
            name: "Sepolia".to_string(),
            chain_id: 11_155_111,
            rpc: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            ens_registry: Some(ENS_REGISTRY),
            base_asset: Asset {
                symbol: "SepETH".to_string(),
                name: "Sepolia Ether".to_string(),
                ..Asset::ether()
            },
            contracts: Vec::new(),
        },
    ]
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

pub fn parse(content: &str) -> Config {
    match toml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("ignoring unparsable config: {err}");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("INTERACT_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("interact").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("interact").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "interact", "interact")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("interact"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("interact"));
    }
    directories::ProjectDirs::from("io", "interact", "interact")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn contracts_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("contracts.sqlite3"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_builtins() {
        let config = parse("");
        assert_eq!(config.default_network(), "Ethereum");
        assert_eq!(config.explorer_api(), DEFAULT_EXPLORER_API);

        let networks = config.networks();
        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0].chain_id, 1);
        assert!(networks.iter().all(|n| n.supports_ens()));
    }

    #[test]
    fn test_parse_networks() {
        let config = parse(
            r#"
            default_network = "Local"
            etherscan_api_key = "KEY"

            [[networks]]
            id = "Local"
            chain_id = 31337
            rpc = "http://localhost:8545"

            [networks.base_asset]
            symbol = "GO"
            name = "Go"
            decimals = 18
            "#,
        );

        assert_eq!(config.default_network(), "Local");
        assert_eq!(config.etherscan_api_key.as_deref(), Some("KEY"));
        let networks = config.networks();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0].name, "Local");
        assert_eq!(networks[0].base_asset.symbol, "GO");
        assert!(!networks[0].supports_ens());
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let config = parse("networks = 12");
        assert!(config.networks.is_empty());
    }
}
