pub mod accounts;
pub mod common;
pub mod constants;
pub mod instruction;
pub mod rpc;
pub mod storage;
pub mod trading;
pub mod utils;

use std::sync::Arc;

use accounts::GlobalAccount;
use common::{LaunchConfig, LaunchResult, TokenInfo};
use rpc::{RpcGatewayClient, SolRpcGateway};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use trading::core::launcher::{quote_initial_buy, InitialBuyQuote};
use trading::{LaunchReceipt, TokenLauncher};

pub struct PumpLaunch {
    pub payer: Arc<Keypair>,
    pub rpc: Arc<RpcGatewayClient>,
    launcher: TokenLauncher,
}

impl PumpLaunch {
    /// Connects to `launch_config.rpc_url` through the solana-client gateway.
    #[inline]
    pub fn new(payer: Arc<Keypair>, launch_config: LaunchConfig) -> Self {
        let rpc: Arc<RpcGatewayClient> = Arc::new(SolRpcGateway::from_url(
            launch_config.rpc_url.clone(),
            launch_config.account_commitment,
        ));
        Self::with_rpc(payer, rpc, launch_config)
    }

    /// Uses a caller-provided gateway instead of connecting to `rpc_url`.
    #[inline]
    pub fn with_rpc(
        payer: Arc<Keypair>,
        rpc: Arc<RpcGatewayClient>,
        launch_config: LaunchConfig,
    ) -> Self {
        let launcher = TokenLauncher::new(rpc.clone(), launch_config);
        Self {
            payer,
            rpc,
            launcher,
        }
    }

    #[inline]
    pub fn get_payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    #[inline]
    pub fn get_launch_config(&self) -> &LaunchConfig {
        self.launcher.config()
    }

    /// Create a token and buy into its bonding curve in a single transaction
    ///
    /// # Arguments
    ///
    /// * `token` - Name, symbol and metadata URI of the new token
    /// * `sol_amount` - Lamports to spend on the initial buy
    ///
    /// # Returns
    ///
    /// The submitted signature and the new mint. The call returns once the node accepted the
    /// transaction; it does not wait for confirmation.
    ///
    /// # Errors
    ///
    /// - The global account is missing or malformed
    /// - The node keeps failing past the retry budget, or rejects the transaction outright
    /// - The launch deadline passes
    pub async fn launch(&self, token: &TokenInfo, sol_amount: u64) -> LaunchResult<LaunchReceipt> {
        self.launcher.launch(self.payer.as_ref(), token, sol_amount).await
    }

    #[inline]
    pub async fn get_global_account(&self) -> LaunchResult<GlobalAccount> {
        self.launcher.fetch_global_state().await
    }

    /// Quotes an initial buy against the live global account without launching anything.
    pub async fn get_initial_buy_quote(&self, sol_amount: u64) -> LaunchResult<InitialBuyQuote> {
        let global = self.get_global_account().await?;
        let slippage = self.get_launch_config().slippage_basis_points;
        quote_initial_buy(&global, sol_amount, slippage)
    }
}
