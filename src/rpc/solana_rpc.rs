use std::{str::FromStr, sync::Arc};

use serde_json::json;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_config::RpcSendTransactionConfig,
    rpc_request::{RpcError as JsonRpcError, RpcRequest},
    rpc_response::{Response, RpcBlockhash},
};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::UiTransactionEncoding;

use super::{RecentBlockhash, RpcGateway, SendOptions};
use crate::common::{RpcError, SolanaRpcClient};

// JSON-RPC server error codes that mean "ask again later"
const BLOCK_NOT_AVAILABLE: i64 = -32004;
const NODE_UNHEALTHY: i64 = -32005;
const SLOT_SKIPPED: i64 = -32007;
const LONG_TERM_STORAGE_SLOT_SKIPPED: i64 = -32009;
const MIN_CONTEXT_SLOT_NOT_REACHED: i64 = -32016;

const TRANSIENT_RPC_CODES: [i64; 5] = [
    BLOCK_NOT_AVAILABLE,
    NODE_UNHEALTHY,
    SLOT_SKIPPED,
    LONG_TERM_STORAGE_SLOT_SKIPPED,
    MIN_CONTEXT_SLOT_NOT_REACHED,
];

/// [`RpcGateway`] over the nonblocking solana-client.
#[derive(Clone)]
pub struct SolRpcGateway {
    pub rpc_client: Arc<SolanaRpcClient>,
}

impl SolRpcGateway {
    pub fn new(rpc_client: Arc<SolanaRpcClient>) -> Self {
        Self { rpc_client }
    }

    pub fn from_url(rpc_url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        let rpc_client = SolanaRpcClient::new_with_commitment(rpc_url.into(), commitment);
        Self::new(Arc::new(rpc_client))
    }
}

#[async_trait::async_trait]
impl RpcGateway for SolRpcGateway {
    async fn get_latest_blockhash(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<RecentBlockhash, RpcError> {
        // `RpcClient::get_latest_blockhash_with_commitment` drops the response context, and the
        // context slot is what the submit pins as its minimum.
        let response = self
            .rpc_client
            .send::<Response<RpcBlockhash>>(RpcRequest::GetLatestBlockhash, json!([commitment]))
            .await
            .map_err(classify_client_error)?;

        let value = &response.value.blockhash;
        let blockhash = Hash::from_str(value)
            .map_err(|e| RpcError::Permanent(format!("invalid blockhash {value}: {e}")))?;

        Ok(RecentBlockhash {
            blockhash,
            slot: response.context.slot,
        })
    }

    async fn get_account_data(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> Result<Option<Vec<u8>>, RpcError> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, commitment)
            .await
            .map_err(classify_client_error)?;

        Ok(response.value.map(|account| account.data))
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        options: SendOptions,
    ) -> Result<Signature, RpcError> {
        self.rpc_client
            .send_transaction_with_config(
                transaction,
                RpcSendTransactionConfig {
                    skip_preflight: options.skip_preflight,
                    preflight_commitment: Some(options.preflight_commitment),
                    encoding: Some(UiTransactionEncoding::Base64),
                    // resubmission is ours to control
                    max_retries: Some(0),
                    min_context_slot: options.min_context_slot,
                },
            )
            .await
            .map_err(classify_client_error)
    }
}

/// Sorts a solana-client failure into retryable and non-retryable.
///
/// Transport failures, rate limiting, 5xx responses and the node-lagging JSON-RPC codes are
/// transient. Everything else, preflight simulation failures included, is permanent.
pub fn classify_client_error(err: ClientError) -> RpcError {
    let transient = match err.kind() {
        ClientErrorKind::Io(_) => true,
        ClientErrorKind::Reqwest(e) => {
            e.is_timeout()
                || e.is_connect()
                || e
                    .status()
                    .map(|status| status.as_u16() == 429 || status.is_server_error())
                    .unwrap_or(false)
        }
        ClientErrorKind::RpcError(JsonRpcError::RpcResponseError { code, .. }) => {
            TRANSIENT_RPC_CODES.contains(code)
        }
        _ => false,
    };

    if transient {
        RpcError::Transient(err.to_string())
    } else {
        RpcError::Permanent(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_client::rpc_request::RpcResponseErrorData;
    use solana_sdk::transaction::TransactionError;

    fn response_error(code: i64, message: &str) -> ClientError {
        ClientError::from(ClientErrorKind::RpcError(JsonRpcError::RpcResponseError {
            code,
            message: message.to_string(),
            data: RpcResponseErrorData::Empty,
        }))
    }

    #[test]
    fn test_node_lag_is_transient() {
        for code in TRANSIENT_RPC_CODES {
            assert!(classify_client_error(response_error(code, "node is behind")).is_transient());
        }
    }

    #[test]
    fn test_io_failure_is_transient() {
        let err = ClientError::from(ClientErrorKind::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )));
        assert!(classify_client_error(err).is_transient());
    }

    #[test]
    fn test_rejections_are_permanent() {
        // preflight simulation failure
        let err = classify_client_error(response_error(
            -32002,
            "Transaction simulation failed: Attempt to debit an account but found no record",
        ));
        assert!(!err.is_transient());
        assert!(err.to_string().contains("simulation failed"), "{err}");

        let err = ClientError::from(ClientErrorKind::TransactionError(
            TransactionError::InsufficientFundsForFee,
        ));
        assert!(!classify_client_error(err).is_transient());

        let err = ClientError::from(ClientErrorKind::Custom("invalid account".to_string()));
        assert!(!classify_client_error(err).is_transient());
    }
}
