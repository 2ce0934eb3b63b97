pub mod trade {
    use std::time::Duration;

    use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};

    pub const DEFAULT_SLIPPAGE: u64 = 1000; // 10%

    /// Initial buy amounts are quoted against a payment padded by 1/20 (5%)
    pub const INITIAL_BUY_BUFFER_DIVISOR: u64 = 20;

    pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

    pub const DEFAULT_RPC_ATTEMPTS: usize = 3;

    /// Attempt n waits n * step before the next try
    pub const DEFAULT_RETRY_STEP: Duration = Duration::from_secs(1);

    pub const DEFAULT_GLOBAL_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

    pub const DEFAULT_LAUNCH_DEADLINE: Duration = Duration::from_secs(30);

    pub const DEFAULT_ACCOUNT_COMMITMENT: CommitmentConfig = CommitmentConfig {
        commitment: CommitmentLevel::Confirmed,
    };

    pub const DEFAULT_BLOCKHASH_COMMITMENT: CommitmentConfig = CommitmentConfig {
        commitment: CommitmentLevel::Processed,
    };

    pub const DEFAULT_PREFLIGHT_COMMITMENT: CommitmentConfig = CommitmentConfig {
        commitment: CommitmentLevel::Processed,
    };

    pub const IPFS_URI_SCHEME: &str = "ipfs://";
}

pub use trade::*;
