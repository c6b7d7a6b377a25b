use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeting_client::config::Config;
use greeting_client::ledger::{load_or_generate_payer, SolanaLedger};
use greeting_client::program;
use greeting_client::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging with JSON formatting (configurable via env)
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string())
        .eq_ignore_ascii_case("json");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greeting_client=info".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        service = "greeting-client",
        version = env!("CARGO_PKG_VERSION"),
        "Starting greeting session"
    );

    let config = Config::load()?;
    tracing::info!(
        rpc_url = %config.rpc_url,
        commitment = %config.commitment,
        "Configuration loaded"
    );

    let program_id = program::resolve_program_id(&config.program_keypair_path)?;
    let ledger = SolanaLedger::connect(&config.rpc_url, &config.commitment);

    let mut session =
        Session::establish(ledger, program_id, config.signature_fee_margin).await?;

    let payer = load_or_generate_payer(&config.payer_keypair_path)?;
    session.fund(payer).await?;

    program::verify_deployed(
        session.rpc(),
        session.program_id(),
        Path::new(&config.program_so_path),
    )
    .await?;

    session.ensure_accounts().await?;
    session.invoke().await?;
    let record = session.report().await?;

    tracing::info!(
        %program_id,
        input_a = record.input_a,
        input_b = record.input_b,
        sum = record.sum,
        "Session complete"
    );

    Ok(())
}
