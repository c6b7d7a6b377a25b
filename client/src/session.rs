//! Account session pipeline
//!
//! A [`Session`] walks a fixed progression: `Connected` → `Funded` →
//! `AccountsReady` → `Invoked` → `Reported`. Each transition checks the phase
//! it requires and advances the tag, so calling the pipeline out of order is
//! a hard error instead of a latent bug. Funding and account creation are
//! idempotent: rerunning them against the same cluster state performs no
//! airdrops and no creation transactions.

use anyhow::{Context, Result};
use solana_sdk::{
    pubkey::{Pubkey, PubkeyError},
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::time::Duration;
use tracing::info;

use crate::error::SessionError;
use crate::instructions;
use crate::ledger::LedgerRpc;
use crate::records::{CustomRecord, GreetingRecord};

/// Seed strings for the two program-owned record accounts.
pub const GREETING_SEED: &str = "greeting";
pub const CUSTOM_SEED: &str = "custom";

const AIRDROP_CONFIRM_ATTEMPTS: u32 = 30;
const AIRDROP_CONFIRM_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connected,
    Funded,
    AccountsReady,
    Invoked,
    Reported,
}

/// Derive a record account address from the payer identity, a fixed seed and
/// the owning program. Pure: identical inputs always yield the same address.
pub fn derive_record_address(
    base: &Pubkey,
    seed: &str,
    program_id: &Pubkey,
) -> Result<Pubkey, PubkeyError> {
    Pubkey::create_with_seed(base, seed, program_id)
}

pub struct Session<R: LedgerRpc> {
    rpc: R,
    program_id: Pubkey,
    signature_fee_margin: u64,
    payer: Option<Keypair>,
    greeting: Option<Pubkey>,
    custom: Option<Pubkey>,
    phase: Phase,
}

impl<R: LedgerRpc> Session<R> {
    /// Establish the session by probing the remote node. Unreachable endpoint
    /// is fatal; there is no retry.
    pub async fn establish(rpc: R, program_id: Pubkey, signature_fee_margin: u64) -> Result<Self> {
        let version = rpc.version().await?;
        info!(%program_id, version, "Connection established");
        Ok(Self {
            rpc,
            program_id,
            signature_fee_margin,
            payer: None,
            greeting: None,
            custom: None,
            phase: Phase::Connected,
        })
    }

    /// Bind the payer identity, topping its balance up via airdrop when it
    /// cannot cover one record's rent exemption plus the signature-fee
    /// margin. Already-funded payers trigger no airdrop.
    pub async fn fund(&mut self, payer: Keypair) -> Result<()> {
        self.expect_phase(Phase::Connected)?;

        let rent = self
            .rpc
            .minimum_balance_for_rent_exemption(GreetingRecord::SPACE)
            .await?;
        let per_signature = self.rpc.lamports_per_signature().await?;
        // Margin policy is a configurable multiple of the signature fee, a
        // placeholder rather than an exact fee accounting.
        let estimate = rent + per_signature * self.signature_fee_margin;

        let balance = self.rpc.balance(&payer.pubkey()).await?;
        if balance < estimate {
            let shortfall = estimate - balance;
            info!(
                payer = %payer.pubkey(),
                balance,
                estimate,
                shortfall,
                "Payer underfunded, requesting airdrop"
            );
            let signature = self
                .rpc
                .request_airdrop(&payer.pubkey(), shortfall)
                .await
                .map_err(|e| SessionError::Funding {
                    reason: e.to_string(),
                })?;
            self.await_airdrop(&signature).await?;
        }

        let balance = self.rpc.balance(&payer.pubkey()).await?;
        info!(payer = %payer.pubkey(), balance, "Payer funded");

        self.payer = Some(payer);
        self.phase = Phase::Funded;
        Ok(())
    }

    /// Derive both record addresses and create whichever accounts do not
    /// exist yet, greeting first. Existing accounts are reused, which makes
    /// the phase idempotent across runs.
    pub async fn ensure_accounts(&mut self) -> Result<()> {
        self.expect_phase(Phase::Funded)?;
        let base = self.payer()?.pubkey();

        let greeting = derive_record_address(&base, GREETING_SEED, &self.program_id)
            .context("Failed to derive greeting account address")?;
        let custom = derive_record_address(&base, CUSTOM_SEED, &self.program_id)
            .context("Failed to derive custom account address")?;

        self.ensure_account(&greeting, GREETING_SEED, GreetingRecord::SPACE)
            .await?;
        self.ensure_account(&custom, CUSTOM_SEED, CustomRecord::SPACE)
            .await?;

        self.greeting = Some(greeting);
        self.custom = Some(custom);
        self.phase = Phase::AccountsReady;
        Ok(())
    }

    /// Submit the greeting instruction referencing both record accounts,
    /// signed solely by the payer.
    pub async fn invoke(&mut self) -> Result<Signature> {
        self.expect_phase(Phase::AccountsReady)?;
        let greeting = self.record_address(self.greeting)?;
        let custom = self.record_address(self.custom)?;
        let payer = self.payer()?;

        let ix = instructions::process_records(&self.program_id, &greeting, &custom);
        let blockhash = self.rpc.latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );
        let signature = self
            .rpc
            .send_and_confirm(&tx)
            .await
            .context("Greeting instruction failed")?;
        info!(%signature, program_id = %self.program_id, "Greeting instruction confirmed");

        self.phase = Phase::Invoked;
        Ok(signature)
    }

    /// Fetch the greeting account and decode its bytes. A missing account is
    /// an explicit error distinct from a schema mismatch.
    pub async fn report(&mut self) -> Result<GreetingRecord> {
        self.expect_phase(Phase::Invoked)?;
        let greeting = self.record_address(self.greeting)?;

        let account = self
            .rpc
            .account(&greeting)
            .await?
            .ok_or(SessionError::AccountNotFound { address: greeting })?;
        let record = GreetingRecord::decode(&account.data)?;
        info!(
            program_id = %self.program_id,
            sum = record.sum,
            "Greeting record decoded"
        );

        self.phase = Phase::Reported;
        Ok(record)
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn greeting_address(&self) -> Option<Pubkey> {
        self.greeting
    }

    pub fn custom_address(&self) -> Option<Pubkey> {
        self.custom
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    async fn ensure_account(&self, address: &Pubkey, seed: &str, space: usize) -> Result<()> {
        if self.rpc.account(address).await?.is_some() {
            info!(%address, seed, "Account already exists, reusing");
            return Ok(());
        }

        let lamports = self.rpc.minimum_balance_for_rent_exemption(space).await?;
        let payer = self.payer()?;
        let ix = instructions::create_record_account(
            &payer.pubkey(),
            address,
            seed,
            lamports,
            space as u64,
            &self.program_id,
        );
        let blockhash = self.rpc.latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );
        let signature = self
            .rpc
            .send_and_confirm(&tx)
            .await
            .with_context(|| format!("Failed to create account {address}"))?;
        info!(%address, seed, space, %signature, "Created record account");
        Ok(())
    }

    /// Poll for airdrop confirmation. A single funding attempt is made; a
    /// confirmation that never lands is fatal.
    async fn await_airdrop(&self, signature: &Signature) -> Result<()> {
        for _ in 0..AIRDROP_CONFIRM_ATTEMPTS {
            let confirmed =
                self.rpc
                    .confirm_signature(signature)
                    .await
                    .map_err(|e| SessionError::Funding {
                        reason: e.to_string(),
                    })?;
            if confirmed {
                return Ok(());
            }
            tokio::time::sleep(AIRDROP_CONFIRM_INTERVAL).await;
        }
        Err(SessionError::Funding {
            reason: format!("airdrop {signature} was not confirmed in time"),
        }
        .into())
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::Phase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn payer(&self) -> Result<&Keypair, SessionError> {
        self.payer.as_ref().ok_or(SessionError::Phase {
            expected: Phase::Funded,
            actual: self.phase,
        })
    }

    fn record_address(&self, address: Option<Pubkey>) -> Result<Pubkey, SessionError> {
        address.ok_or(SessionError::Phase {
            expected: Phase::AccountsReady,
            actual: self.phase,
        })
    }
}
