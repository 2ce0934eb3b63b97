use std::time::Duration;

use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::{
    common::{LaunchError, LaunchResult},
    constants::{
        pumpfun::accounts::PUMPFUN,
        trade::{
            DEFAULT_ACCOUNT_COMMITMENT, DEFAULT_BLOCKHASH_COMMITMENT, DEFAULT_GLOBAL_FETCH_TIMEOUT,
            DEFAULT_LAUNCH_DEADLINE, DEFAULT_PREFLIGHT_COMMITMENT, DEFAULT_SLIPPAGE,
        },
    },
    trading::common::retry::RetryPolicy,
};

pub type SolanaRpcClient = solana_client::nonblocking::rpc_client::RpcClient;

pub type AnyResult<T> = anyhow::Result<T>;

/// Tunables of a launch. `Default` matches what the pump program expects on mainnet.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    /// Ceiling on what the buy may cost, above the requested payment
    pub slippage_basis_points: u64,
    /// Shared by the global-state read, the blockhash read and the submit
    pub retry_policy: RetryPolicy,
    /// Per-attempt bound on the global account read
    pub global_fetch_timeout: Duration,
    /// Bound on the whole pipeline, retries included
    pub launch_deadline: Duration,
    pub account_commitment: CommitmentConfig,
    pub blockhash_commitment: CommitmentConfig,
    pub preflight_commitment: CommitmentConfig,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            program_id: PUMPFUN,
            slippage_basis_points: DEFAULT_SLIPPAGE,
            retry_policy: RetryPolicy::default(),
            global_fetch_timeout: DEFAULT_GLOBAL_FETCH_TIMEOUT,
            launch_deadline: DEFAULT_LAUNCH_DEADLINE,
            account_commitment: DEFAULT_ACCOUNT_COMMITMENT,
            blockhash_commitment: DEFAULT_BLOCKHASH_COMMITMENT,
            preflight_commitment: DEFAULT_PREFLIGHT_COMMITMENT,
        }
    }
}

impl LaunchConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Self::default()
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_launch_deadline(mut self, launch_deadline: Duration) -> Self {
        self.launch_deadline = launch_deadline;
        self
    }

    /// Rejects settings that could never complete a launch.
    pub fn validate(&self) -> LaunchResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(LaunchError::Config("rpc_url is empty".to_string()));
        }
        if self.retry_policy.max_attempts == 0 {
            return Err(LaunchError::Config(
                "retry_policy.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.global_fetch_timeout.is_zero() {
            return Err(LaunchError::Config("global_fetch_timeout must be non-zero".to_string()));
        }
        if self.launch_deadline.is_zero() {
            return Err(LaunchError::Config("launch_deadline must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Name, ticker and metadata location of the token being launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl TokenInfo {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LaunchConfig::default().validate().is_ok());
        assert!(LaunchConfig::new("http://localhost:8899").validate().is_ok());
    }

    #[test]
    fn test_unusable_config_is_rejected() {
        let configs = [
            LaunchConfig::new(" "),
            LaunchConfig::default().with_retry_policy(RetryPolicy::new(0, Duration::from_secs(1))),
            LaunchConfig {
                global_fetch_timeout: Duration::ZERO,
                ..LaunchConfig::default()
            },
            LaunchConfig::default().with_launch_deadline(Duration::ZERO),
        ];
        for config in configs {
            assert!(
                matches!(config.validate(), Err(LaunchError::Config(_))),
                "{config:?}"
            );
        }
    }
}
