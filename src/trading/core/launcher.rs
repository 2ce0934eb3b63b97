//! Create-and-buy pipeline.
//!
//! A launch runs these stages once each, in order, and stops at the first error:
//!
//! `FetchGlobalState -> DeriveAddresses -> ComputePrice -> BuildInstructions -> FetchRecency ->
//! Sign -> Submit`
//!
//! The three stages that talk to the node are retried under the configured [`RetryPolicy`]
//! (transient errors only) and the whole run is bounded by `LaunchConfig::launch_deadline`.
//! Everything a launch produces, the mint keypair included, lives on the stack of one call, so
//! launches sharing a [`TokenLauncher`] never see each other's state.
//!
//! [`RetryPolicy`]: crate::trading::common::retry::RetryPolicy

use std::{fmt, sync::Arc};

use log::{debug, info};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};

use super::timer::LaunchTimer;
use crate::{
    accounts::global::GlobalAccount,
    common::{LaunchConfig, LaunchError, LaunchResult, RpcError, TokenInfo},
    constants::pumpfun::accounts::MPL_TOKEN_METADATA,
    instruction::pumpfun::{self, Buy, Create},
    rpc::{RecentBlockhash, RpcGatewayClient, SendOptions},
    trading::{
        common::{retry::RetryFailure, transaction_builder::build_launch_transaction},
        pumpfun::common::{get_global_pda, LaunchAccounts},
    },
    utils::calc::common::calculate_with_slippage_buy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchStage {
    FetchGlobalState,
    DeriveAddresses,
    ComputePrice,
    BuildInstructions,
    FetchRecency,
    Sign,
    Submit,
}

impl fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LaunchStage::FetchGlobalState => "fetch global state",
            LaunchStage::DeriveAddresses => "derive addresses",
            LaunchStage::ComputePrice => "compute price",
            LaunchStage::BuildInstructions => "build instructions",
            LaunchStage::FetchRecency => "fetch recent blockhash",
            LaunchStage::Sign => "sign",
            LaunchStage::Submit => "submit",
        };
        write!(f, "{}", s)
    }
}

/// What a successful launch reports back. The mint keypair is not kept; `mint` is the only
/// handle on the new token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReceipt {
    pub signature: Signature,
    pub mint: Pubkey,
    /// Tokens the buy asked for
    pub token_amount: u64,
    /// Lamport ceiling the buy was allowed to spend
    pub max_sol_cost: u64,
    /// Slot the submit was pinned to
    pub min_context_slot: u64,
}

/// Token amount and cost ceiling of the initial buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialBuyQuote {
    pub token_amount: u64,
    pub max_sol_cost: u64,
}

/// Quotes the initial buy for `sol_amount` lamports against a fresh curve.
pub fn quote_initial_buy(
    global: &GlobalAccount,
    sol_amount: u64,
    slippage_basis_points: u64,
) -> LaunchResult<InitialBuyQuote> {
    let token_amount = global.get_initial_buy_price(sol_amount)?;
    let max_sol_cost = calculate_with_slippage_buy(sol_amount, slippage_basis_points)?;
    Ok(InitialBuyQuote {
        token_amount,
        max_sol_cost,
    })
}

/// The three instructions of a launch: create, the user's token account, buy.
pub fn build_launch_instructions(
    accounts: &LaunchAccounts,
    global: &GlobalAccount,
    token: &TokenInfo,
    quote: &InitialBuyQuote,
) -> LaunchResult<Vec<Instruction>> {
    let create = Create {
        name: token.name.clone(),
        symbol: token.symbol.clone(),
        uri: token.uri.clone(),
        creator: accounts.user,
    };
    let buy = Buy {
        amount: quote.token_amount,
        max_sol_cost: quote.max_sol_cost,
    };

    Ok(vec![
        pumpfun::create(accounts, &create)?,
        pumpfun::create_user_token_account(accounts),
        pumpfun::buy(accounts, &global.fee_recipient, &buy)?,
    ])
}

/// Turns the last error of a retried remote call into a launch error for `stage`.
fn escalate(stage: LaunchStage, failure: RetryFailure<RpcError>) -> LaunchError {
    if failure.error.is_transient() {
        LaunchError::LaunchFailed {
            stage,
            attempts: failure.attempts,
            source: failure.error,
        }
    } else {
        LaunchError::rpc(stage, failure.error)
    }
}

pub struct TokenLauncher {
    rpc: Arc<RpcGatewayClient>,
    config: LaunchConfig,
}

impl TokenLauncher {
    pub fn new(rpc: Arc<RpcGatewayClient>, config: LaunchConfig) -> Self {
        Self { rpc, config }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Launches `token` with a freshly generated mint and buys `sol_amount` lamports worth of it.
    pub async fn launch(
        &self,
        payer: &Keypair,
        token: &TokenInfo,
        sol_amount: u64,
    ) -> LaunchResult<LaunchReceipt> {
        let mint = Keypair::new();
        self.launch_with_mint(payer, &mint, token, sol_amount).await
    }

    /// Same as [`launch`](Self::launch) with a caller-supplied mint keypair.
    pub async fn launch_with_mint(
        &self,
        payer: &Keypair,
        mint: &Keypair,
        token: &TokenInfo,
        sol_amount: u64,
    ) -> LaunchResult<LaunchReceipt> {
        self.config.validate()?;

        let deadline = self.config.launch_deadline;
        tokio::time::timeout(deadline, self.run(payer, mint, token, sol_amount))
            .await
            .map_err(|_| LaunchError::Timeout(deadline))?
    }

    async fn run(
        &self,
        payer: &Keypair,
        mint: &Keypair,
        token: &TokenInfo,
        sol_amount: u64,
    ) -> LaunchResult<LaunchReceipt> {
        let user = payer.pubkey();
        info!(
            "Launching {} ({}) as mint {}",
            token.name,
            token.symbol,
            mint.pubkey()
        );

        let mut timer = LaunchTimer::new(LaunchStage::FetchGlobalState);
        let global = self.fetch_global_state().await?;

        timer.stage(LaunchStage::DeriveAddresses);
        let accounts = LaunchAccounts::derive(
            &self.config.program_id,
            &MPL_TOKEN_METADATA,
            &mint.pubkey(),
            &user,
        )?;

        timer.stage(LaunchStage::ComputePrice);
        let quote = quote_initial_buy(&global, sol_amount, self.config.slippage_basis_points)?;
        debug!(
            "Initial buy: {} lamports -> {} tokens, max cost {}",
            sol_amount, quote.token_amount, quote.max_sol_cost
        );

        timer.stage(LaunchStage::BuildInstructions);
        let instructions = build_launch_instructions(&accounts, &global, token, &quote)?;

        timer.stage(LaunchStage::FetchRecency);
        let recent = self.fetch_recent_blockhash().await?;

        timer.stage(LaunchStage::Sign);
        let signers: [&dyn Signer; 2] = [payer, mint];
        let transaction =
            build_launch_transaction(&user, &instructions, &signers, recent.blockhash)?;

        timer.stage(LaunchStage::Submit);
        let signature = self.submit(&transaction, recent.slot).await?;
        timer.finish();

        info!("Submitted launch of {}: {}", accounts.mint, signature);
        Ok(LaunchReceipt {
            signature,
            mint: accounts.mint,
            token_amount: quote.token_amount,
            max_sol_cost: quote.max_sol_cost,
            min_context_slot: recent.slot,
        })
    }

    /// Reads and decodes the global account. Each attempt is bounded by
    /// `global_fetch_timeout`; an attempt that runs out counts as transient.
    pub async fn fetch_global_state(&self) -> LaunchResult<GlobalAccount> {
        let stage = LaunchStage::FetchGlobalState;
        info!("Stage: {}", stage);

        let (global, _) = get_global_pda(&self.config.program_id)?;
        let rpc = self.rpc.as_ref();
        let commitment = self.config.account_commitment;
        let fetch_timeout = self.config.global_fetch_timeout;

        let data = self.config
            .retry_policy
            .run(
                "fetch global state",
                || async move {
                    match tokio::time::timeout(
                        fetch_timeout,
                        rpc.get_account_data(&global, commitment),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(RpcError::Transient(format!(
                            "no response within {:?}",
                            fetch_timeout
                        ))),
                    }
                },
                RpcError::is_transient,
            )
            .await
            .map_err(|failure| escalate(stage, failure))?
            .ok_or(LaunchError::AccountNotFound(global))?;

        GlobalAccount::decode(&data)
    }

    async fn fetch_recent_blockhash(&self) -> LaunchResult<RecentBlockhash> {
        let stage = LaunchStage::FetchRecency;
        info!("Stage: {}", stage);

        let rpc = self.rpc.as_ref();
        let commitment = self.config.blockhash_commitment;
        self.config
            .retry_policy
            .run(
                "fetch recent blockhash",
                || async move { rpc.get_latest_blockhash(commitment).await },
                RpcError::is_transient,
            )
            .await
            .map_err(|failure| escalate(stage, failure))
    }

    /// Sends the signed transaction with preflight on, pinned to `min_context_slot`. Resending
    /// the same signed bytes is harmless: the ledger deduplicates by signature.
    async fn submit(
        &self,
        transaction: &Transaction,
        min_context_slot: u64,
    ) -> LaunchResult<Signature> {
        let stage = LaunchStage::Submit;
        info!("Stage: {} {}", stage, transaction.signatures[0]);

        let rpc = self.rpc.as_ref();
        let options = SendOptions {
            skip_preflight: false,
            preflight_commitment: self.config.preflight_commitment.commitment,
            min_context_slot: Some(min_context_slot),
        };
        self.config
            .retry_policy
            .run(
                "submit",
                || async move { rpc.send_transaction(transaction, options).await },
                RpcError::is_transient,
            )
            .await
            .map_err(|failure| escalate(stage, failure))
    }
}
