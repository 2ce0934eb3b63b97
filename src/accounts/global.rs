//! Global account for the Pump.fun Solana Program
//!
//! This module contains the definition for the global configuration account and the initial
//! buy quote computed from it.
//!
//! # Global Account
//!
//! The global account is a singleton PDA (seed `"global"`) holding the curve parameters every
//! new bonding curve starts from. Only the leading fields below are decoded; the program has
//! appended more since, and those trailing bytes are ignored.
//!
//! # Fields
//!
//! - `discriminator`: Unique identifier for the global account
//! - `initialized`: Whether the global account has been initialized
//! - `authority`: Authority pubkey that can modify settings
//! - `fee_recipient`: Account that receives fees
//! - `initial_virtual_token_reserves`: Initial virtual token reserves for price calculations
//! - `initial_virtual_sol_reserves`: Initial virtual SOL reserves for price calculations
//! - `initial_real_token_reserves`: Initial actual token reserves available for trading
//! - `token_total_supply`: Total supply of tokens
//! - `fee_basis_points`: Fee in basis points (1/100th of a percent)

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    common::{layout::GLOBAL_ACCOUNT_LAYOUT, LaunchError, LaunchResult},
    constants::{pumpfun::global_constants::*, trade::INITIAL_BUY_BUFFER_DIVISOR},
};

/// Represents the global configuration account for token pricing and fees
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GlobalAccount {
    /// Unique identifier for the global account
    pub discriminator: u64,
    /// Whether the global account has been initialized
    pub initialized: bool,
    /// Authority that can modify global settings
    pub authority: Pubkey,
    /// Account that receives fees
    pub fee_recipient: Pubkey,
    /// Initial virtual token reserves for price calculations
    pub initial_virtual_token_reserves: u64,
    /// Initial virtual SOL reserves for price calculations
    pub initial_virtual_sol_reserves: u64,
    /// Initial actual token reserves available for trading
    pub initial_real_token_reserves: u64,
    /// Total supply of tokens
    pub token_total_supply: u64,
    /// Fee in basis points (1/100th of a percent)
    pub fee_basis_points: u64,
}

impl Default for GlobalAccount {
    /// Mainnet values at the time of writing. Pricing always uses a freshly decoded account;
    /// this exists for tests and offline quotes.
    fn default() -> Self {
        Self {
            discriminator: 0,
            initialized: true,
            authority: AUTHORITY,
            fee_recipient: FEE_RECIPIENT,
            initial_virtual_token_reserves: INITIAL_VIRTUAL_TOKEN_RESERVES,
            initial_virtual_sol_reserves: INITIAL_VIRTUAL_SOL_RESERVES,
            initial_real_token_reserves: INITIAL_REAL_TOKEN_RESERVES,
            token_total_supply: TOKEN_TOTAL_SUPPLY,
            fee_basis_points: FEE_BASIS_POINTS,
        }
    }
}

impl GlobalAccount {
    /// Decodes raw account data. Fails if `data` is shorter than [`GLOBAL_ACCOUNT_LAYOUT`].
    pub fn decode(data: &[u8]) -> LaunchResult<Self> {
        let required = GLOBAL_ACCOUNT_LAYOUT.min_len();
        if data.is_empty() {
            return Err(LaunchError::Decode {
                account: GLOBAL_ACCOUNT_LAYOUT.name,
                reason: "account data is empty".to_string(),
            });
        }
        if data.len() < required {
            return Err(LaunchError::Decode {
                account: GLOBAL_ACCOUNT_LAYOUT.name,
                reason: format!("expected at least {} bytes, got {}", required, data.len()),
            });
        }

        let mut cursor = data;
        Self::deserialize(&mut cursor).map_err(|e| LaunchError::Decode {
            account: GLOBAL_ACCOUNT_LAYOUT.name,
            reason: e.to_string(),
        })
    }

    /// Calculates the initial amount of tokens received for a given SOL amount
    ///
    /// The payment is padded by 5% before it is run through the constant-product curve, and the
    /// remaining-token term is rounded up by always adding one after the division, so the quote
    /// errs towards fewer tokens. The on-chain program rounds the same way.
    ///
    /// # Arguments
    /// * `amount` - Amount of SOL to spend, in lamports
    ///
    /// # Returns
    /// Amount of tokens that would be received, never more than `initial_real_token_reserves`
    pub fn get_initial_buy_price(&self, amount: u64) -> LaunchResult<u64> {
        if amount == 0 {
            return Ok(0);
        }

        let virtual_sol = self.initial_virtual_sol_reserves as u128;
        let virtual_token = self.initial_virtual_token_reserves as u128;

        let amount = amount as u128;
        let amount = amount + amount / INITIAL_BUY_BUFFER_DIVISOR as u128;

        // k = x * y, at most (2^64 - 1)^2 so it always fits
        let k = virtual_sol * virtual_token;
        let new_sol_reserves = virtual_sol + amount;

        // new_sol_reserves >= amount > 0
        let remaining_tokens = k / new_sol_reserves + 1;

        let tokens_out = virtual_token
            .checked_sub(remaining_tokens)
            .ok_or(LaunchError::NegativeQuantity)?;
        let tokens_out = u64::try_from(tokens_out)
            .map_err(|_| LaunchError::QuantityOverflow("token amount"))?;

        Ok(tokens_out.min(self.initial_real_token_reserves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::layout::GLOBAL_ACCOUNT_LAYOUT;
    use solana_sdk::pubkey;

    fn encoded(global: &GlobalAccount) -> Vec<u8> {
        borsh::to_vec(global).unwrap()
    }

    #[test]
    fn test_decode_matches_layout() {
        let global = GlobalAccount {
            discriminator: u64::from_le_bytes([167, 232, 232, 177, 200, 108, 114, 127]),
            fee_recipient: pubkey!("CebN5WGQ4jvEPvsVU4EoHEpgzq1VV7AbicfhtW4xC9iM"),
            ..GlobalAccount::default()
        };
        let data = encoded(&global);
        assert_eq!(Some(data.len()), GLOBAL_ACCOUNT_LAYOUT.fixed_len());

        let offset = GLOBAL_ACCOUNT_LAYOUT.offset_of("fee_recipient").unwrap();
        assert_eq!(&data[offset..offset + 32], global.fee_recipient.as_ref());
        let offset = GLOBAL_ACCOUNT_LAYOUT.offset_of("initial_real_token_reserves").unwrap();
        assert_eq!(
            &data[offset..offset + 8],
            &INITIAL_REAL_TOKEN_RESERVES.to_le_bytes()
        );

        assert_eq!(GlobalAccount::decode(&data).unwrap(), global);
    }

    #[test]
    fn test_decode_ignores_trailing_fields() {
        let global = GlobalAccount::default();
        let mut data = encoded(&global);
        // withdraw_authority, enable_migrate, ... appended by later program versions
        data.extend_from_slice(&[7u8; 128]);
        assert_eq!(GlobalAccount::decode(&data).unwrap(), global);
    }

    #[test]
    fn test_decode_rejects_empty_and_short_data() {
        assert!(matches!(GlobalAccount::decode(&[]), Err(LaunchError::Decode { .. })));

        let data = encoded(&GlobalAccount::default());
        let err = GlobalAccount::decode(&data[..data.len() - 1]).unwrap_err();
        match err {
            LaunchError::Decode { reason, .. } => assert!(reason.contains("112"), "{reason}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_invalid_bool() {
        let mut data = encoded(&GlobalAccount::default());
        data[GLOBAL_ACCOUNT_LAYOUT.offset_of("initialized").unwrap()] = 2;
        assert!(matches!(
            GlobalAccount::decode(&data),
            Err(LaunchError::Decode { .. })
        ));
    }

    #[test]
    fn test_zero_payment_buys_nothing() {
        assert_eq!(
            GlobalAccount::default().get_initial_buy_price(0).unwrap(),
            0
        );

        let empty_curve = GlobalAccount {
            initial_virtual_token_reserves: 0,
            initial_virtual_sol_reserves: 0,
            ..GlobalAccount::default()
        };
        assert_eq!(empty_curve.get_initial_buy_price(0).unwrap(), 0);
    }

    #[test]
    fn test_initial_buy_golden_values() {
        let global = GlobalAccount {
            initial_virtual_token_reserves: 1_073_000_000_000_000,
            initial_virtual_sol_reserves: 30_000_000_000_000,
            ..GlobalAccount::default()
        };
        assert_eq!(
            global.get_initial_buy_price(10_000_000).unwrap(),
            375_549_868
        );

        // same pair with the token reserves first
        let global = GlobalAccount {
            initial_virtual_token_reserves: 30_000_000_000_000,
            initial_virtual_sol_reserves: 1_073_000_000_000_000,
            initial_real_token_reserves: u64::MAX,
            ..GlobalAccount::default()
        };
        assert_eq!(global.get_initial_buy_price(10_000_000).unwrap(), 293_569);

        // mainnet curve, 0.01 SOL and 1 SOL
        let global = GlobalAccount::default();
        assert_eq!(
            global.get_initial_buy_price(10_000_000).unwrap(),
            375_418_603_488
        );
        assert_eq!(
            global.get_initial_buy_price(1_000_000_000).unwrap(),
            36_285_024_154_589
        );
    }

    #[test]
    fn test_initial_buy_is_clamped_to_real_reserves() {
        let global = GlobalAccount::default();
        let tokens = global.get_initial_buy_price(100_000_000_000_000).unwrap();
        assert_eq!(tokens, INITIAL_REAL_TOKEN_RESERVES);

        for amount in [1, 1_000, 10_000_000, 5_000_000_000, u64::MAX] {
            let tokens = global.get_initial_buy_price(amount).unwrap();
            assert!(tokens <= global.initial_real_token_reserves);
        }
    }

    #[test]
    fn test_rounding_always_adds_one() {
        // k = 100 * 100, new sol reserves = 100 + 21 + 1 = 122 -> 10_000 / 122 = 81 r 118
        let global = GlobalAccount {
            initial_virtual_token_reserves: 100,
            initial_virtual_sol_reserves: 100,
            initial_real_token_reserves: u64::MAX,
            ..GlobalAccount::default()
        };
        assert_eq!(global.get_initial_buy_price(21).unwrap(), 100 - 82);

        // exact division still takes the extra token: 100 * 100 / (100 + 100) = 50
        let global = GlobalAccount {
            initial_virtual_token_reserves: 100,
            initial_virtual_sol_reserves: 100,
            initial_real_token_reserves: u64::MAX,
            ..GlobalAccount::default()
        };
        // 96 + 96 / 20 = 100
        assert_eq!(global.get_initial_buy_price(96).unwrap(), 100 - 51);
    }

    #[test]
    fn test_negative_quantity_without_token_reserves() {
        // no virtual tokens: the rounded-up remainder (1) exceeds what the curve holds
        let global = GlobalAccount {
            initial_virtual_token_reserves: 0,
            initial_virtual_sol_reserves: 1,
            ..GlobalAccount::default()
        };
        assert!(matches!(
            global.get_initial_buy_price(1_000_000_000),
            Err(LaunchError::NegativeQuantity)
        ));
    }

    #[test]
    fn test_large_reserves_do_not_overflow() {
        let global = GlobalAccount {
            initial_virtual_token_reserves: u64::MAX,
            initial_virtual_sol_reserves: u64::MAX,
            initial_real_token_reserves: u64::MAX,
            ..GlobalAccount::default()
        };
        let tokens = global.get_initial_buy_price(u64::MAX).unwrap();
        assert!(tokens > 0 && tokens < u64::MAX);
    }
}
