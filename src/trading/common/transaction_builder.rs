use solana_sdk::{
    hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey, signer::Signer,
    transaction::Transaction,
};

use crate::common::{LaunchError, LaunchResult};

/// Compiles `instructions` into a legacy transaction paid by `payer` and signs it.
///
/// Every signer-flagged account must have a key in `signers`; otherwise this fails with
/// [`LaunchError::MissingSigner`] and nothing is signed. Keys that the message does not need are
/// ignored.
pub fn build_launch_transaction(
    payer: &Pubkey,
    instructions: &[Instruction],
    signers: &[&dyn Signer],
    recent_blockhash: Hash,
) -> LaunchResult<Transaction> {
    let message = Message::new_with_blockhash(instructions, Some(payer), &recent_blockhash);
    let signing_keys = resolve_signers(&message, signers)?;

    let mut transaction = Transaction::new_unsigned(message);
    transaction.try_sign(&signing_keys, recent_blockhash)?;
    Ok(transaction)
}

/// Picks one key per required signer, in message order.
pub fn resolve_signers<'a>(
    message: &Message,
    signers: &[&'a dyn Signer],
) -> LaunchResult<Vec<&'a dyn Signer>> {
    let required = message.header.num_required_signatures as usize;
    message
        .account_keys
        .iter()
        .take(required)
        .map(|key| {
            signers
                .iter()
                .find(|signer| signer.pubkey() == *key)
                .copied()
                .ok_or(LaunchError::MissingSigner(*key))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::pumpfun::accounts::{MPL_TOKEN_METADATA, PUMPFUN},
        instruction::pumpfun::{self, Buy, Create},
        trading::pumpfun::common::LaunchAccounts,
    };
    use solana_sdk::signature::Keypair;

    fn launch_instructions(user: &Keypair, mint: &Keypair) -> Vec<Instruction> {
        let accounts = LaunchAccounts::derive(
            &PUMPFUN,
            &MPL_TOKEN_METADATA,
            &mint.pubkey(),
            &user.pubkey(),
        )
        .unwrap();
        let create = Create {
            name: "Test Token".to_string(),
            symbol: "TEST".to_string(),
            uri: "ipfs://bafkreigh2akiscaildc".to_string(),
            creator: user.pubkey(),
        };
        let buy = Buy {
            amount: 1,
            max_sol_cost: 2,
        };
        vec![
            pumpfun::create(&accounts, &create).unwrap(),
            pumpfun::create_user_token_account(&accounts),
            pumpfun::buy(&accounts, &Pubkey::new_unique(), &buy).unwrap(),
        ]
    }

    #[test]
    fn test_signs_with_user_and_mint() {
        let user = Keypair::new();
        let mint = Keypair::new();
        let blockhash = Hash::new_unique();
        let tx = build_launch_transaction(
            &user.pubkey(),
            &launch_instructions(&user, &mint),
            &[&mint, &user],
            blockhash,
        )
        .unwrap();

        assert_eq!(tx.message.account_keys[0], user.pubkey());
        assert_eq!(tx.message.header.num_required_signatures, 2);
        assert_eq!(tx.message.recent_blockhash, blockhash);
        assert_eq!(tx.message.instructions.len(), 3);
        assert!(tx.is_signed());
        assert!(tx.verify().is_ok());
    }

    #[test]
    fn test_missing_mint_key_is_rejected() {
        let user = Keypair::new();
        let mint = Keypair::new();
        let err = build_launch_transaction(
            &user.pubkey(),
            &launch_instructions(&user, &mint),
            &[&user],
            Hash::new_unique(),
        )
        .unwrap_err();
        assert!(matches!(err, LaunchError::MissingSigner(key) if key == mint.pubkey()));
    }

    #[test]
    fn test_missing_payer_key_is_rejected() {
        let user = Keypair::new();
        let mint = Keypair::new();
        let err = build_launch_transaction(
            &user.pubkey(),
            &launch_instructions(&user, &mint),
            &[&mint],
            Hash::new_unique(),
        )
        .unwrap_err();
        assert!(matches!(err, LaunchError::MissingSigner(key) if key == user.pubkey()));
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let user = Keypair::new();
        let mint = Keypair::new();
        let stranger = Keypair::new();
        let tx = build_launch_transaction(
            &user.pubkey(),
            &launch_instructions(&user, &mint),
            &[&stranger, &user, &mint],
            Hash::new_unique(),
        )
        .unwrap();
        assert!(tx.verify().is_ok());
    }
}
