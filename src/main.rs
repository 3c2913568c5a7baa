use std::path::PathBuf;

use alloy::primitives::Address;
use clap::Parser;
use eyre::WrapErr;
use tracing::info;

use vault_depositor::{
    account::Account,
    chain,
    config::{self, RunSettings, DEFAULT_ROUTER},
    logging::setup_logging,
    orchestrator::Orchestrator,
};

/// Deposit token balances into vaults across EVM networks. The private key is always
/// read from a prompt, never from flags or the environment.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON list of {name, asset, contract, networks}
    #[arg(long, default_value = "vaults.json")]
    vaults: PathBuf,

    /// JSON list of {name, rpc_url} replacing the built-in testnet endpoints
    #[arg(long)]
    networks: Option<PathBuf>,

    /// Router that receives approvals and deposit calls
    #[arg(long, default_value_t = DEFAULT_ROUTER)]
    router: Address,

    /// Level or filter directives, e.g. `debug` or `vault_depositor=trace`. Balances and
    /// transaction hashes are logged at info; the final ALL DONE line always prints
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let vaults = config::load_vaults(&args.vaults)?;
    let networks = match &args.networks {
        Some(path) => config::load_networks(path)?,
        None => config::default_networks(),
    };
    info!(vaults = vaults.len(), networks = networks.len(), "loaded config");

    let account = Account::prompt()?;
    info!(address = %account.address(), "account loaded");

    let chains = chain::connect(&networks, account.wallet())
        .await
        .wrap_err("connect networks")?;

    let settings = RunSettings {
        router: args.router,
        ..Default::default()
    };
    let summary = Orchestrator::new(&vaults, &chains, account.address(), settings)
        .run()
        .await;
    println!("{summary}");

    Ok(())
}
