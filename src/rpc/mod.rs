pub mod solana_rpc;

use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use crate::common::RpcError;

pub use solana_rpc::SolRpcGateway;

/// A blockhash together with the slot the node answered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentBlockhash {
    pub blockhash: Hash,
    pub slot: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: CommitmentLevel,
    /// The node refuses to evaluate the transaction against state older than this slot
    pub min_context_slot: Option<u64>,
}

pub type RpcGatewayClient = dyn RpcGateway + Send + Sync + 'static;

/// Read/write boundary to a Solana node.
///
/// Implementations classify every failure as [`RpcError::Transient`] or
/// [`RpcError::Permanent`]; the launcher only retries the former.
#[async_trait::async_trait]
pub trait RpcGateway: Send + Sync {
    async fn get_latest_blockhash(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<RecentBlockhash, RpcError>;

    /// `Ok(None)` when the account does not exist.
    async fn get_account_data(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> Result<Option<Vec<u8>>, RpcError>;

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        options: SendOptions,
    ) -> Result<Signature, RpcError>;
}
