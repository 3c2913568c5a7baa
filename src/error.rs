//! Error types for configuration, chain reads and transaction submission.
use alloy::{
    primitives::TxHash,
    transports::{TransportError, TransportErrorKind},
};
use thiserror::Error;

/// Text a node puts in the error message of a call that failed during execution.
pub const REVERT_MARKER: &str = "execution reverted";

/// JSON-RPC error code geth and most clients use for execution reverts.
const REVERT_CODE: i64 = 3;

/// Errors raised while loading configuration files. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A failed `eth_call` against a token contract.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),
    #[error(transparent)]
    Rpc(#[from] TransportError),
}

/// A transaction that could not be signed or broadcast.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The node rejected the transaction because its execution reverted. Worth retrying.
    #[error("{message}")]
    Reverted { message: String },
    #[error(transparent)]
    Rpc(TransportError),
}

impl SubmitError {
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Reverted { .. })
    }

    pub fn reverted(message: impl Into<String>) -> Self {
        Self::Reverted {
            message: message.into(),
        }
    }

    pub fn transport(message: &str) -> Self {
        Self::Rpc(TransportErrorKind::custom_str(message))
    }
}

impl From<TransportError> for SubmitError {
    fn from(err: TransportError) -> Self {
        if is_revert(&err) {
            Self::Reverted {
                message: err.to_string(),
            }
        } else {
            Self::Rpc(err)
        }
    }
}

/// Classifies a transport error as an on-chain revert.
///
/// Prefers the structured error response (code 3 or attached revert data) and falls
/// back to scanning the message for [`REVERT_MARKER`], since not every node fills in
/// either.
pub fn is_revert(err: &TransportError) -> bool {
    if let Some(payload) = err.as_error_resp() {
        if payload.code == REVERT_CODE || payload.as_revert_data().is_some() {
            return true;
        }
    }
    err.to_string().contains(REVERT_MARKER)
}

/// Why a (vault, network) pair stopped before depositing.
#[derive(Debug, Error)]
pub enum PairError {
    #[error("network {0} is not configured")]
    UnknownNetwork(String),
    #[error("get balance: {0}")]
    Balance(#[source] ReadError),
    #[error("check allowance: {0}")]
    Allowance(#[source] ReadError),
    #[error("approve: {0}")]
    Approve(#[source] SubmitError),
    #[error("approval {0} reverted")]
    ApprovalReverted(TxHash),
    #[error("deposit: {0}")]
    Deposit(#[source] SubmitError),
}
