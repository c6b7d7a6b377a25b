//! Error taxonomy for the greeting session pipeline
//!
//! Every variant is fatal: the pipeline never catches and recovers, it aborts
//! the run and surfaces the error to the caller. Variants carry enough context
//! to name the remediation (which file to provide, which program to deploy).

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::session::Phase;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Keypair file missing or unreadable.
    #[error("cannot load keypair file {path}: {reason}")]
    Keypair { path: String, reason: String },

    /// Compiled program binary absent on disk.
    #[error("program binary {path} not found; build the on-chain program first")]
    ProgramBinaryMissing { path: String },

    /// Binary exists on disk but the program account is absent on the cluster.
    #[error("program {program_id} is built but not deployed; deploy it to the target cluster")]
    ProgramNotDeployed { program_id: Pubkey },

    /// Program account exists but is not marked executable.
    #[error("account {program_id} exists but is not an executable program")]
    ProgramNotExecutable { program_id: Pubkey },

    /// Airdrop request or its confirmation failed. Single attempt, no retry.
    #[error("payer funding failed: {reason}")]
    Funding { reason: String },

    /// Expected data account absent at report time.
    #[error("account {address} not found; run the account creation phase first")]
    AccountNotFound { address: Pubkey },

    /// Account bytes do not match the record schema. Never defaults silently.
    #[error("account data does not match the expected record schema: {reason}")]
    Decode { reason: String },

    /// Pipeline phase invoked out of order.
    #[error("session phase out of order: expected {expected:?}, got {actual:?}")]
    Phase { expected: Phase, actual: Phase },
}
