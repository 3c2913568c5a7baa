use std::fmt;

use alloy::primitives::{Address, TxHash, U256};
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::{
    calls::DepositCall,
    chain::{Chain, ChainRegistry},
    client::ChainClient,
    config::{RunSettings, Vault},
    error::PairError,
    retry::{retry_on_revert, RetryOutcome},
};

pub fn needs_approval(allowance: U256, balance: U256) -> bool {
    allowance <= balance
}

#[derive(Debug)]
pub enum PairOutcome {
    /// Balance at or below the dust threshold; nothing was sent.
    BelowThreshold { balance: U256 },
    Deposited {
        amount: U256,
        tx: TxHash,
        approval: Option<TxHash>,
        attempts: usize,
    },
    RetriesExhausted {
        amount: U256,
        approval: Option<TxHash>,
        attempts: usize,
    },
    Failed(PairError),
}

#[derive(Debug)]
pub struct PairReport {
    pub vault: String,
    pub network: String,
    pub outcome: PairOutcome,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<PairReport>,
}

impl RunSummary {
    pub fn deposited(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Deposited { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::BelowThreshold { .. }))
    }

    pub fn exhausted(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::RetriesExhausted { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Failed(_)))
    }

    pub fn find(&self, vault: &str, network: &str) -> Option<&PairOutcome> {
        self.reports
            .iter()
            .find(|r| r.vault == vault && r.network == network)
            .map(|r| &r.outcome)
    }

    fn count(&self, f: impl Fn(&PairOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| f(&r.outcome)).count()
    }
}

/// The completion line. Printed directly so a log filter cannot hide it.
impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ALL DONE! deposited={} skipped={} exhausted={} failed={}",
            self.deposited(),
            self.skipped(),
            self.exhausted(),
            self.failed()
        )
    }
}

pub struct Orchestrator<'a, C> {
    vaults: &'a [Vault],
    chains: &'a ChainRegistry<C>,
    depositor: Address,
    settings: RunSettings,
}

impl<'a, C: ChainClient> Orchestrator<'a, C> {
    pub fn new(
        vaults: &'a [Vault],
        chains: &'a ChainRegistry<C>,
        depositor: Address,
        settings: RunSettings,
    ) -> Self {
        Self {
            vaults,
            chains,
            depositor,
            settings,
        }
    }

    // per-pair errors end up in the summary, never in the return type
    pub async fn run(&self) -> RunSummary {
        self.warn_unconfigured();

        let mut summary = RunSummary::default();
        for vault in self.vaults {
            for network in &vault.networks {
                sleep(self.settings.throttle).await;

                let outcome = match self.evaluate(vault, network).await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        error!(vault = %vault.name, %network, error = %err, "pair failed");
                        PairOutcome::Failed(err)
                    }
                };
                summary.reports.push(PairReport {
                    vault: vault.name.clone(),
                    network: network.clone(),
                    outcome,
                });
            }
        }

        summary
    }

    fn warn_unconfigured(&self) {
        for vault in self.vaults {
            for network in vault.networks.iter().filter(|n| !self.chains.contains(n)) {
                warn!(vault = %vault.name, %network, "vault lists a network with no rpc endpoint");
            }
        }
    }

    async fn evaluate(&self, vault: &Vault, network: &str) -> Result<PairOutcome, PairError> {
        let chain = self
            .chains
            .get(network)
            .ok_or_else(|| PairError::UnknownNetwork(network.to_string()))?;
        let client = &chain.client;

        let balance = client
            .balance_of(vault.asset, self.depositor)
            .await
            .map_err(PairError::Balance)?;
        if balance <= self.settings.dust_threshold {
            debug!(vault = %vault.name, network, %balance, "balance below threshold");
            return Ok(PairOutcome::BelowThreshold { balance });
        }
        info!(vault = %vault.name, network, %balance, "found balance");

        let allowance = client
            .allowance(vault.asset, self.depositor, self.settings.router)
            .await
            .map_err(PairError::Allowance)?;

        let approval = if needs_approval(allowance, balance) {
            let tx = client
                .approve(chain.id, vault.asset, self.settings.router, U256::MAX)
                .await
                .map_err(PairError::Approve)?;
            info!(vault = %vault.name, network, %tx, "approve tx");
            self.await_approval(chain, tx).await?;
            Some(tx)
        } else {
            None
        };

        let amount = balance.saturating_sub(self.settings.deposit_buffer);
        let data = DepositCall {
            asset: vault.asset,
            depositor: self.depositor,
            vault: vault.target_contract,
            amount,
        }
        .abi_encode();

        let router = self.settings.router;
        let outcome = retry_on_revert(
            move |attempt| {
                debug!(vault = %vault.name, network, attempt, "submitting deposit");
                client.submit(chain.id, router, data.clone())
            },
            self.settings.max_attempts,
            self.settings.retry_delay,
        )
        .await;

        match outcome {
            RetryOutcome::Success { value: tx, attempts } => {
                info!(vault = %vault.name, network, %amount, %tx, "deposited");
                Ok(PairOutcome::Deposited {
                    amount,
                    tx,
                    approval,
                    attempts,
                })
            }
            RetryOutcome::NonRetryable { error, .. } => Err(PairError::Deposit(error)),
            RetryOutcome::RetriesExhausted {
                attempts,
                last_error,
            } => {
                warn!(
                    vault = %vault.name,
                    network,
                    attempts,
                    error = %last_error.map(|e| e.to_string()).unwrap_or_default(),
                    "deposit kept reverting, giving up"
                );
                Ok(PairOutcome::RetriesExhausted {
                    amount,
                    approval,
                    attempts,
                })
            }
        }
    }

    // a timeout is not an error, the deposit retries cover an allowance that lands late
    async fn await_approval(&self, chain: &Chain<C>, tx: TxHash) -> Result<(), PairError> {
        let started = Instant::now();

        loop {
            match chain.client.receipt_status(tx).await {
                Ok(Some(true)) => return Ok(()),
                Ok(Some(false)) => return Err(PairError::ApprovalReverted(tx)),
                Ok(None) => {}
                Err(e) => {
                    debug!(network = %chain.name, %tx, error = %e, "receipt lookup error; retrying");
                }
            }

            if started.elapsed() >= self.settings.receipt_timeout {
                warn!(network = %chain.name, %tx, "approval not mined before timeout");
                return Ok(());
            }
            sleep(self.settings.receipt_poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_needed_unless_allowance_exceeds_balance() {
        let balance = U256::from(1000);
        assert!(needs_approval(U256::ZERO, balance));
        assert!(needs_approval(balance, balance));
        assert!(!needs_approval(U256::from(1001), balance));
        assert!(!needs_approval(U256::MAX, balance));
    }

    #[test]
    fn summary_counts_by_outcome() {
        let report = |network: &str, outcome| PairReport {
            vault: "v".into(),
            network: network.into(),
            outcome,
        };
        let summary = RunSummary {
            reports: vec![
                report("eth", PairOutcome::BelowThreshold { balance: U256::from(5) }),
                report(
                    "arb",
                    PairOutcome::Failed(PairError::UnknownNetwork("arb".into())),
                ),
                report(
                    "op",
                    PairOutcome::RetriesExhausted {
                        amount: U256::from(1),
                        approval: None,
                        attempts: 5,
                    },
                ),
            ],
        };

        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.exhausted(), 1);
        assert_eq!(summary.deposited(), 0);
        assert!(matches!(
            summary.find("v", "arb"),
            Some(PairOutcome::Failed(_))
        ));
        assert_eq!(
            summary.to_string(),
            "ALL DONE! deposited=0 skipped=1 exhausted=1 failed=1"
        );
    }

    #[test]
    fn empty_run_still_completes() {
        assert_eq!(
            RunSummary::default().to_string(),
            "ALL DONE! deposited=0 skipped=0 exhausted=0 failed=0"
        );
    }
}
