use std::time::Duration;

use solana_sdk::{pubkey::Pubkey, signer::SignerError};
use thiserror::Error;

use crate::trading::core::launcher::LaunchStage;

/// Failure reported by an [`RpcGateway`](crate::rpc::RpcGateway).
///
/// Gateways must sort every failure into one of the two classes: the launch pipeline retries
/// `Transient` errors within its attempt budget and surfaces `Permanent` ones immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// Network failure, rate limit or an unhealthy / lagging node
    #[error("transient rpc error: {0}")]
    Transient(String),

    /// The node rejected the request (bad account, failed preflight, insufficient funds, ...)
    #[error("rpc rejected request: {0}")]
    Permanent(String),
}

impl RpcError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RpcError::Transient(_))
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no off-curve bump found for {kind} address under program {program}")]
    DerivationExhausted { kind: &'static str, program: Pubkey },

    #[error("failed to encode {instruction} instruction arguments: {source}")]
    Encoding {
        instruction: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {account} account: {reason}")]
    Decode {
        account: &'static str,
        reason: String,
    },

    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("computed token quantity is negative")]
    NegativeQuantity,

    #[error("computed {0} does not fit in u64")]
    QuantityOverflow(&'static str),

    #[error("no signing key available for required signer {0}")]
    MissingSigner(Pubkey),

    #[error("failed to sign transaction: {0}")]
    Signing(#[from] SignerError),

    #[error("{stage}: {source}")]
    Rpc {
        stage: LaunchStage,
        #[source]
        source: RpcError,
    },

    #[error("{stage} failed after {attempts} attempts: {source}")]
    LaunchFailed {
        stage: LaunchStage,
        attempts: usize,
        #[source]
        source: RpcError,
    },

    #[error("launch did not finish within {0:?}")]
    Timeout(Duration),

    #[error("invalid launch configuration: {0}")]
    Config(String),
}

impl LaunchError {
    /// Whether the launch failed on a transient node error, so that calling `launch` again
    /// later may succeed. Everything else is a defect in the inputs or in this crate and fails
    /// the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            LaunchError::Rpc { source, .. } | LaunchError::LaunchFailed { source, .. } => {
                source.is_transient()
            }
            _ => false,
        }
    }

    /// The pipeline stage a remote failure happened in, if any.
    pub fn stage(&self) -> Option<LaunchStage> {
        match self {
            LaunchError::Rpc { stage, .. } | LaunchError::LaunchFailed { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }

    pub(crate) fn rpc(stage: LaunchStage, source: RpcError) -> Self {
        LaunchError::Rpc { stage, source }
    }
}

pub type LaunchResult<T> = Result<T, LaunchError>;
