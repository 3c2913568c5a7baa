use std::{fs, path::Path, time::Duration};

use alloy::primitives::{address, Address, U256};
use serde::Deserialize;

use crate::error::ConfigError;

/// Router that pulls approved tokens and forwards them into vault contracts.
pub const DEFAULT_ROUTER: Address = address!("3267e72Dc8780A1512fa69DA7759eC66f30350E3");

/// A token and the contract that accepts deposits of it, on one or more networks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Vault {
    pub name: String,
    pub asset: Address,
    #[serde(rename = "contract")]
    pub target_contract: Address,
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkEndpoint {
    pub name: String,
    pub rpc_url: String,
}

impl NetworkEndpoint {
    pub fn new(name: &str, rpc_url: &str) -> Self {
        Self {
            name: name.to_string(),
            rpc_url: rpc_url.to_string(),
        }
    }
}

/// Public testnet endpoints used when no override file is given.
pub fn default_networks() -> Vec<NetworkEndpoint> {
    vec![
        NetworkEndpoint::new("eth", "https://rpc.sepolia.org"),
        NetworkEndpoint::new("arb", "https://sepolia-rollup.arbitrum.io/rpc"),
        NetworkEndpoint::new("op", "https://sepolia.optimism.io/"),
        NetworkEndpoint::new("base", "https://sepolia.base.org"),
        NetworkEndpoint::new("linea", "https://linea-sepolia-rpc.publicnode.com"),
    ]
}

pub fn load_vaults(path: impl AsRef<Path>) -> Result<Vec<Vault>, ConfigError> {
    read_json(path.as_ref())
}

/// Reads a JSON array of `{name, rpc_url}` that replaces [`default_networks`].
pub fn load_networks(path: impl AsRef<Path>) -> Result<Vec<NetworkEndpoint>, ConfigError> {
    read_json(path.as_ref())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

/// Fixed knobs of a deposit pass.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub router: Address,
    /// Balances at or below this are left alone.
    pub dust_threshold: U256,
    /// Held back from the observed balance when depositing.
    pub deposit_buffer: U256,
    pub max_attempts: usize,
    /// Pause before every pair, to stay under provider rate limits.
    pub throttle: Duration,
    pub retry_delay: Duration,
    pub receipt_poll: Duration,
    pub receipt_timeout: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            router: DEFAULT_ROUTER,
            dust_threshold: U256::from(100),
            deposit_buffer: U256::from(10),
            max_attempts: 5,
            throttle: Duration::from_secs(3),
            retry_delay: Duration::from_secs(5),
            receipt_poll: Duration::from_secs(1),
            receipt_timeout: Duration::from_secs(60),
        }
    }
}
