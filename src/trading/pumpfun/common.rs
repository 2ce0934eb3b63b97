//! PDA derivations for every account the `create` and `buy` instructions touch.
//!
//! Each helper takes the owning program explicitly so the same code derives against a fork or a
//! devnet deployment of the pump program.

use solana_sdk::pubkey::Pubkey;

use crate::{
    common::{LaunchError, LaunchResult},
    constants::pumpfun::{
        accounts::{ASSOCIATED_TOKEN_PROGRAM, TOKEN_PROGRAM},
        seeds::{
            BONDING_CURVE_SEED, CREATOR_VAULT_SEED, GLOBAL_SEED, METADATA_SEED,
            MINT_AUTHORITY_SEED,
        },
    },
};

/// Searches bumps 255..=0 for the first off-curve address. No result means the seeds or the
/// program id are wrong, so this is never retried.
#[inline]
fn find_pda(
    kind: &'static str,
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> LaunchResult<(Pubkey, u8)> {
    let program = *program_id;
    Pubkey::try_find_program_address(seeds, program_id)
        .ok_or(LaunchError::DerivationExhausted { kind, program })
}

/// Seeds: `["mint-authority"]`
#[inline]
pub fn get_mint_authority_pda(program_id: &Pubkey) -> LaunchResult<(Pubkey, u8)> {
    find_pda("mint authority", &[MINT_AUTHORITY_SEED], program_id)
}

/// Seeds: `["bonding-curve", mint]`
#[inline]
pub fn get_bonding_curve_pda(mint: &Pubkey, program_id: &Pubkey) -> LaunchResult<(Pubkey, u8)> {
    find_pda(
        "bonding curve",
        &[BONDING_CURVE_SEED, mint.as_ref()],
        program_id,
    )
}

/// Seeds: `["global"]`
#[inline]
pub fn get_global_pda(program_id: &Pubkey) -> LaunchResult<(Pubkey, u8)> {
    find_pda("global", &[GLOBAL_SEED], program_id)
}

/// Token account of the bonding curve. Seeds: `[bonding_curve, token_program, mint]`, owned by
/// the associated token account program.
#[inline]
pub fn get_associated_bonding_curve_pda(
    bonding_curve: &Pubkey,
    mint: &Pubkey,
) -> LaunchResult<(Pubkey, u8)> {
    find_pda(
        "associated bonding curve",
        &[
            bonding_curve.as_ref(),
            TOKEN_PROGRAM.as_ref(),
            mint.as_ref(),
        ],
        &ASSOCIATED_TOKEN_PROGRAM,
    )
}

/// Seeds: `["metadata", metadata_program, mint]`, owned by the metadata program.
#[inline]
pub fn get_metadata_pda(mint: &Pubkey, metadata_program: &Pubkey) -> LaunchResult<(Pubkey, u8)> {
    find_pda(
        "metadata",
        &[METADATA_SEED, metadata_program.as_ref(), mint.as_ref()],
        metadata_program,
    )
}

/// Seeds: `[wallet, token_program, mint]`, owned by the associated token account program.
#[inline]
pub fn get_associated_token_pda(wallet: &Pubkey, mint: &Pubkey) -> LaunchResult<(Pubkey, u8)> {
    find_pda(
        "associated token",
        &[wallet.as_ref(), TOKEN_PROGRAM.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM,
    )
}

/// Seeds: `["creator-vault", creator]`
#[inline]
pub fn get_creator_vault_pda(creator: &Pubkey, program_id: &Pubkey) -> LaunchResult<(Pubkey, u8)> {
    find_pda(
        "creator vault",
        &[CREATOR_VAULT_SEED, creator.as_ref()],
        program_id,
    )
}

/// Every derived account a launch needs, computed once from the new mint and the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchAccounts {
    pub program_id: Pubkey,
    pub mint: Pubkey,
    pub user: Pubkey,
    pub global: Pubkey,
    pub mint_authority: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    pub metadata: Pubkey,
    pub user_token_account: Pubkey,
    pub creator_vault: Pubkey,
}

impl LaunchAccounts {
    /// The user is also the creator, so the creator vault is keyed by the user.
    pub fn derive(
        program_id: &Pubkey,
        metadata_program: &Pubkey,
        mint: &Pubkey,
        user: &Pubkey,
    ) -> LaunchResult<Self> {
        let (global, _) = get_global_pda(program_id)?;
        let (mint_authority, _) = get_mint_authority_pda(program_id)?;
        let (bonding_curve, _) = get_bonding_curve_pda(mint, program_id)?;
        let (associated_bonding_curve, _) = get_associated_bonding_curve_pda(&bonding_curve, mint)?;
        let (metadata, _) = get_metadata_pda(mint, metadata_program)?;
        let (user_token_account, _) = get_associated_token_pda(user, mint)?;
        let (creator_vault, _) = get_creator_vault_pda(user, program_id)?;

        Ok(Self {
            program_id: *program_id,
            mint: *mint,
            user: *user,
            global,
            mint_authority,
            bonding_curve,
            associated_bonding_curve,
            metadata,
            user_token_account,
            creator_vault,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::pumpfun::{
        accounts::{MPL_TOKEN_METADATA, PUMPFUN},
        global_constants::GLOBAL_ACCOUNT,
    };
    use solana_sdk::pubkey;
    use spl_associated_token_account::get_associated_token_address;

    #[test]
    fn test_get_global_pda() {
        let (global, _) = get_global_pda(&PUMPFUN).unwrap();
        assert_eq!(global, GLOBAL_ACCOUNT);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let mint = pubkey!("DeESECsL3cLXno1LFquss98kNQSno1xpQC2ERCqSbonk");
        let creator = pubkey!("HBMkgQvt4NAFx6XzNav23bNcv6K3oiC5UfY3JsE22scY");

        assert_eq!(
            get_bonding_curve_pda(&mint, &PUMPFUN).unwrap(),
            get_bonding_curve_pda(&mint, &PUMPFUN).unwrap()
        );
        assert_eq!(
            get_creator_vault_pda(&creator, &PUMPFUN).unwrap(),
            get_creator_vault_pda(&creator, &PUMPFUN).unwrap()
        );
        assert_eq!(
            get_mint_authority_pda(&PUMPFUN).unwrap(),
            get_mint_authority_pda(&PUMPFUN).unwrap()
        );
        assert_eq!(
            LaunchAccounts::derive(&PUMPFUN, &MPL_TOKEN_METADATA, &mint, &creator).unwrap(),
            LaunchAccounts::derive(&PUMPFUN, &MPL_TOKEN_METADATA, &mint, &creator).unwrap()
        );
    }

    #[test]
    fn test_bump_reproduces_address() {
        let mint = Pubkey::new_unique();
        let (bonding_curve, bump) = get_bonding_curve_pda(&mint, &PUMPFUN).unwrap();
        let recreated =
            Pubkey::create_program_address(&[BONDING_CURVE_SEED, mint.as_ref(), &[bump]], &PUMPFUN)
                .unwrap();
        assert_eq!(recreated, bonding_curve);
        assert!(!bonding_curve.is_on_curve());
    }

    #[test]
    fn test_token_accounts_match_spl_derivation() {
        let mint = Pubkey::new_unique();
        let user = Pubkey::new_unique();

        let (user_ata, _) = get_associated_token_pda(&user, &mint).unwrap();
        assert_eq!(user_ata, get_associated_token_address(&user, &mint));

        let (bonding_curve, _) = get_bonding_curve_pda(&mint, &PUMPFUN).unwrap();
        let (curve_ata, _) = get_associated_bonding_curve_pda(&bonding_curve, &mint).unwrap();
        assert_eq!(
            curve_ata,
            get_associated_token_address(&bonding_curve, &mint)
        );
    }

    #[test]
    fn test_pdas_depend_on_program() {
        let mint = Pubkey::new_unique();
        let other_program = Pubkey::new_unique();
        assert_ne!(
            get_bonding_curve_pda(&mint, &PUMPFUN).unwrap().0,
            get_bonding_curve_pda(&mint, &other_program).unwrap().0
        );
        // metadata lives under the metadata program, not under pump
        let (metadata, _) = get_metadata_pda(&mint, &MPL_TOKEN_METADATA).unwrap();
        let (under_pump, _) = get_metadata_pda(&mint, &PUMPFUN).unwrap();
        assert_ne!(metadata, under_pump);
    }

    #[test]
    fn test_launch_accounts_are_distinct() {
        let mint = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let accounts = LaunchAccounts::derive(&PUMPFUN, &MPL_TOKEN_METADATA, &mint, &user).unwrap();
        let all = [
            accounts.global,
            accounts.mint_authority,
            accounts.bonding_curve,
            accounts.associated_bonding_curve,
            accounts.metadata,
            accounts.user_token_account,
            accounts.creator_vault,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
