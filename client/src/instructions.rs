//! Instruction builders for the greeting program

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction,
};

/// Fixed two-byte payload of the greeting instruction. The program interprets
/// the bytes; this client treats them as opaque constants.
pub const PROCESS_DATA: [u8; 2] = [1, 2];

/// Create a seed-derived record account funded by the payer and owned by the
/// greeting program. `space` must equal the record's encoded size.
pub fn create_record_account(
    payer: &Pubkey,
    derived: &Pubkey,
    seed: &str,
    lamports: u64,
    space: u64,
    program_id: &Pubkey,
) -> Instruction {
    system_instruction::create_account_with_seed(
        payer, derived, payer, seed, lamports, space, program_id,
    )
}

/// Invoke the greeting program against both record accounts. Neither account
/// signs; both are writable so the program can store its results.
pub fn process_records(program_id: &Pubkey, greeting: &Pubkey, custom: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*greeting, false),
            AccountMeta::new(*custom, false),
        ],
        data: PROCESS_DATA.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::system_program;

    #[test]
    fn test_create_record_account_targets_system_program() {
        let payer = Pubkey::new_unique();
        let program_id = Pubkey::new_unique();
        let derived = Pubkey::create_with_seed(&payer, "greeting", &program_id).unwrap();

        let ix = create_record_account(&payer, &derived, "greeting", 1_000_000, 12, &program_id);

        assert_eq!(ix.program_id, system_program::ID);
        // Payer signs, the derived account does not (no private key exists)
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert_eq!(ix.accounts[1].pubkey, derived);
        assert!(!ix.accounts[1].is_signer);
    }

    #[test]
    fn test_process_records_shape() {
        let program_id = Pubkey::new_unique();
        let greeting = Pubkey::new_unique();
        let custom = Pubkey::new_unique();

        let ix = process_records(&program_id, &greeting, &custom);

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data, vec![1, 2]);
        assert_eq!(ix.accounts.len(), 2);
        for meta in &ix.accounts {
            assert!(meta.is_writable);
            assert!(!meta.is_signer);
        }
        assert_eq!(ix.accounts[0].pubkey, greeting);
        assert_eq!(ix.accounts[1].pubkey, custom);
    }
}
