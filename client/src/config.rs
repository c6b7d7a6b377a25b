use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    pub commitment: String,
    pub payer_keypair_path: String,
    pub program_keypair_path: String,
    pub program_so_path: String,
    /// Multiple of the per-signature fee added on top of the rent-exemption
    /// minimum when estimating how much the payer needs. A safety margin, not
    /// an exact accounting.
    pub signature_fee_margin: u64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            rpc_url: env::var("SOLANA_RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8899".to_string()),
            commitment: env::var("SOLANA_COMMITMENT")
                .unwrap_or_else(|_| "confirmed".to_string()),
            payer_keypair_path: env::var("PAYER_KEYPAIR")
                .unwrap_or_else(|_| "payer-keypair.json".to_string()),
            program_keypair_path: env::var("PROGRAM_KEYPAIR")
                .unwrap_or_else(|_| "target/deploy/greeting-keypair.json".to_string()),
            program_so_path: env::var("PROGRAM_SO")
                .unwrap_or_else(|_| "target/deploy/greeting.so".to_string()),
            signature_fee_margin: env::var("SIGNATURE_FEE_MARGIN")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,
        })
    }
}
