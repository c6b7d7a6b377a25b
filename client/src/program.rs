//! Target program resolution and deployment checks

use anyhow::Result;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Signer},
};
use std::path::Path;
use tracing::info;

use crate::error::SessionError;
use crate::ledger::LedgerRpc;

/// Resolve the program id from its persisted keypair file.
pub fn resolve_program_id(path: &str) -> Result<Pubkey> {
    let keypair = read_keypair_file(Path::new(path)).map_err(|e| SessionError::Keypair {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(keypair.pubkey())
}

/// Verify the target program is ready to be invoked, distinguishing the three
/// failure modes: binary never built, built but not deployed, and deployed to
/// an address that is not executable. The binary is only checked for
/// existence, never loaded.
pub async fn verify_deployed<R: LedgerRpc>(
    rpc: &R,
    program_id: &Pubkey,
    so_path: &Path,
) -> Result<()> {
    if !so_path.exists() {
        return Err(SessionError::ProgramBinaryMissing {
            path: so_path.display().to_string(),
        }
        .into());
    }

    match rpc.account(program_id).await? {
        None => Err(SessionError::ProgramNotDeployed {
            program_id: *program_id,
        }
        .into()),
        Some(account) if !account.executable => Err(SessionError::ProgramNotExecutable {
            program_id: *program_id,
        }
        .into()),
        Some(_) => {
            info!(%program_id, "Program is deployed and executable");
            Ok(())
        }
    }
}
