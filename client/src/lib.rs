//! Off-chain client for the greeting program
//!
//! Runs a single-shot session against a Solana cluster: establish a
//! connection, fund a payer, create the two seed-derived record accounts on
//! first use, invoke the program, and decode the resulting greeting record.

pub mod config;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod program;
pub mod records;
pub mod session;

pub use config::Config;
pub use error::SessionError;
pub use ledger::{LedgerRpc, SolanaLedger};
pub use records::{CustomRecord, GreetingRecord};
pub use session::{Phase, Session};
