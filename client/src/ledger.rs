//! RPC surface consumed by the session pipeline
//!
//! The pipeline talks to the cluster through the [`LedgerRpc`] trait so the
//! phase logic can be exercised against an in-memory stub in tests.
//! [`SolanaLedger`] is the real implementation over the nonblocking
//! `RpcClient`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::{read_keypair_file, write_keypair_file, Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use std::path::Path;
use tracing::info;

use crate::error::SessionError;

#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Remote node software version, used as the liveness probe.
    async fn version(&self) -> Result<String>;

    async fn balance(&self, pubkey: &Pubkey) -> Result<u64>;

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64>;

    /// Current fee charged per transaction signature.
    async fn lamports_per_signature(&self) -> Result<u64>;

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature>;

    /// Whether the given signature has reached the configured commitment.
    async fn confirm_signature(&self, signature: &Signature) -> Result<bool>;

    /// Account at the address, or `None` if it does not exist.
    async fn account(&self, pubkey: &Pubkey) -> Result<Option<Account>>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature>;
}

pub struct SolanaLedger {
    client: RpcClient,
    url: String,
}

impl SolanaLedger {
    pub fn connect(url: &str, commitment: &str) -> Self {
        let client =
            RpcClient::new_with_commitment(url.to_string(), commitment_config(commitment));
        Self {
            client,
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LedgerRpc for SolanaLedger {
    async fn version(&self) -> Result<String> {
        let version = self
            .client
            .get_version()
            .await
            .with_context(|| format!("RPC endpoint {} unreachable", self.url))?;
        Ok(version.solana_core)
    }

    async fn balance(&self, pubkey: &Pubkey) -> Result<u64> {
        self.client
            .get_balance(pubkey)
            .await
            .with_context(|| format!("Failed to get balance of {pubkey}"))
    }

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(space)
            .await
            .context("Failed to get rent-exemption minimum")
    }

    async fn lamports_per_signature(&self) -> Result<u64> {
        // Fee schedule is queried per message, so price a probe message
        // carrying exactly one required signature.
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .context("Failed to get recent blockhash")?;
        let probe = Keypair::new().pubkey();
        let message = Message::new_with_blockhash(
            &[system_instruction::transfer(&probe, &probe, 0)],
            Some(&probe),
            &blockhash,
        );
        self.client
            .get_fee_for_message(&message)
            .await
            .context("Failed to get per-signature fee")
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature> {
        self.client
            .request_airdrop(pubkey, lamports)
            .await
            .with_context(|| format!("Airdrop request for {pubkey} failed"))
    }

    async fn confirm_signature(&self, signature: &Signature) -> Result<bool> {
        self.client
            .confirm_transaction(signature)
            .await
            .with_context(|| format!("Failed to check confirmation of {signature}"))
    }

    async fn account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .client
            .get_account_with_commitment(pubkey, self.client.commitment())
            .await
            .with_context(|| format!("Failed to query account {pubkey}"))?;
        Ok(response.value)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.client
            .get_latest_blockhash()
            .await
            .context("Failed to get recent blockhash")
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        self.client
            .send_and_confirm_transaction(transaction)
            .await
            .context("Failed to send and confirm transaction")
    }
}

fn commitment_config(commitment: &str) -> CommitmentConfig {
    match commitment {
        "processed" => CommitmentConfig::processed(),
        "confirmed" => CommitmentConfig::confirmed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

/// Load the payer keypair, generating and persisting a fresh one when the
/// file does not exist yet so later runs reuse the same identity.
pub fn load_or_generate_payer(path: &str) -> Result<Keypair> {
    if Path::new(path).exists() {
        let keypair = read_keypair_file(Path::new(path)).map_err(|e| SessionError::Keypair {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(keypair)
    } else {
        let keypair = Keypair::new();
        write_keypair_file(&keypair, path).map_err(|e| SessionError::Keypair {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        info!(path, pubkey = %keypair.pubkey(), "Generated new payer keypair");
        Ok(keypair)
    }
}
