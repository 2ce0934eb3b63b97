use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use spl_associated_token_account::instruction::create_associated_token_account;

use crate::{
    common::{
        layout::{AccountLayout, BUY_ARGS_LAYOUT, CREATE_ARGS_LAYOUT},
        LaunchError, LaunchResult,
    },
    constants::pumpfun::{
        accounts::{
            ASSOCIATED_TOKEN_PROGRAM, EVENT_AUTHORITY, MPL_TOKEN_METADATA, RENT, SYSTEM_PROGRAM,
            TOKEN_PROGRAM,
        },
        instructions::{BUY, CREATE, DISCRIMINATOR_NAMESPACE},
    },
    trading::pumpfun::common::LaunchAccounts,
};

/// First 8 bytes of `sha256("global:<name>")`
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("{DISCRIMINATOR_NAMESPACE}:{name}").as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}

/// `discriminator || borsh(args)`
fn instruction_data<T: BorshSerialize>(
    name: &'static str,
    layout: &AccountLayout,
    args: &T,
) -> LaunchResult<Vec<u8>> {
    let mut data = Vec::with_capacity(8 + layout.min_len());
    data.extend_from_slice(&instruction_discriminator(name));
    args.serialize(&mut data)
        .map_err(|source| LaunchError::Encoding {
            instruction: name,
            source,
        })?;
    Ok(data)
}

/// Arguments of `create`, in program declaration order.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct Create {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub creator: Pubkey,
}

impl Create {
    pub fn data(&self) -> LaunchResult<Vec<u8>> {
        instruction_data(CREATE, &CREATE_ARGS_LAYOUT, self)
    }
}

/// Arguments of `buy`, in program declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize)]
pub struct Buy {
    /// Tokens to receive
    pub amount: u64,
    /// Most lamports the buy may spend
    pub max_sol_cost: u64,
}

impl Buy {
    pub fn data(&self) -> LaunchResult<Vec<u8>> {
        instruction_data(BUY, &BUY_ARGS_LAYOUT, self)
    }
}

/// Creates the mint, its bonding curve and metadata. Both the mint keypair and the user sign.
pub fn create(accounts: &LaunchAccounts, args: &Create) -> LaunchResult<Instruction> {
    Ok(Instruction::new_with_bytes(
        accounts.program_id,
        &args.data()?,
        vec![
            AccountMeta::new(accounts.mint, true),
            AccountMeta::new_readonly(accounts.mint_authority, false),
            AccountMeta::new_readonly(accounts.bonding_curve, false),
            AccountMeta::new(accounts.associated_bonding_curve, false),
            AccountMeta::new(accounts.global, false),
            AccountMeta::new_readonly(MPL_TOKEN_METADATA, false),
            AccountMeta::new(accounts.metadata, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM, false),
            AccountMeta::new_readonly(RENT, false),
            AccountMeta::new_readonly(EVENT_AUTHORITY, false),
            AccountMeta::new_readonly(accounts.program_id, false),
        ],
    ))
}

/// The user's token account for the new mint. `buy` does not create it.
pub fn create_user_token_account(accounts: &LaunchAccounts) -> Instruction {
    create_associated_token_account(
        &accounts.user,
        &accounts.user,
        &accounts.mint,
        &TOKEN_PROGRAM,
    )
}

/// Buys from the curve `create` just opened. `fee_recipient` comes from the global account.
pub fn buy(
    accounts: &LaunchAccounts,
    fee_recipient: &Pubkey,
    args: &Buy,
) -> LaunchResult<Instruction> {
    Ok(Instruction::new_with_bytes(
        accounts.program_id,
        &args.data()?,
        vec![
            AccountMeta::new_readonly(accounts.global, false),
            AccountMeta::new(*fee_recipient, false),
            AccountMeta::new_readonly(accounts.mint, false),
            AccountMeta::new(accounts.bonding_curve, false),
            AccountMeta::new(accounts.associated_bonding_curve, false),
            AccountMeta::new(accounts.user_token_account, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM, false),
            AccountMeta::new(accounts.creator_vault, false),
            AccountMeta::new_readonly(EVENT_AUTHORITY, false),
            AccountMeta::new_readonly(accounts.program_id, false),
        ],
    ))
}
