use std::collections::HashMap;

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{Provider, ProviderBuilder},
    transports::http::{reqwest::Url, Client, Http},
};
use eyre::WrapErr;
use tracing::info;

use crate::{client::EvmClient, config::NetworkEndpoint};

/// A connected network: its name in the vault file, its chain id, and the client used
/// to talk to it.
#[derive(Debug)]
pub struct Chain<C> {
    pub id: u64,
    pub name: String,
    pub client: C,
}

impl<C> Chain<C> {
    pub fn new(name: impl Into<String>, id: u64, client: C) -> Self {
        Self {
            id,
            name: name.into(),
            client,
        }
    }
}

/// Every configured network by name. Built once before the run and only read after.
#[derive(Debug)]
pub struct ChainRegistry<C> {
    chains: HashMap<String, Chain<C>>,
}

impl<C> ChainRegistry<C> {
    pub fn new() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    pub fn insert(&mut self, chain: Chain<C>) {
        self.chains.insert(chain.name.clone(), chain);
    }

    pub fn get(&self, name: &str) -> Option<&Chain<C>> {
        self.chains.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl<C> Default for ChainRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FromIterator<Chain<C>> for ChainRegistry<C> {
    fn from_iter<I: IntoIterator<Item = Chain<C>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for chain in iter {
            registry.insert(chain);
        }
        registry
    }
}

/// Connects to every endpoint and fetches its chain id. Any failure aborts: the run
/// assumes all configured networks are usable.
pub async fn connect(
    endpoints: &[NetworkEndpoint],
    wallet: EthereumWallet,
) -> eyre::Result<ChainRegistry<EvmClient<impl Provider<Http<Client>, Ethereum>, Http<Client>>>>
{
    let mut registry = ChainRegistry::new();

    for endpoint in endpoints {
        let url: Url = endpoint
            .rpc_url
            .parse()
            .wrap_err_with(|| format!("invalid rpc url for {}", endpoint.name))?;

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet.clone())
            .on_http(url);

        let id = provider
            .get_chain_id()
            .await
            .wrap_err_with(|| format!("connect to {} ({})", endpoint.name, endpoint.rpc_url))?;
        info!(network = %endpoint.name, chain_id = id, "connected");

        registry.insert(Chain::new(endpoint.name.clone(), id, EvmClient::new(provider)));
    }

    Ok(registry)
}
