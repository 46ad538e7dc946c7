//! `vvallet` command-line client.
//!
//! Lookups run against a read-only client; writes sign with the keypair at
//! `--keypair` / `$VVALLET_KEYPAIR` (default `~/.config/solana/id.json`).

use clap::Parser;
use std::sync::Arc;

use vvallet_client::app::cli::{self, Cli};
use vvallet_client::solana::SharedSigner;
use vvallet_client::{ClientConfig, VVallet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let cmd = args.command.clone();

    let config = ClientConfig::from_env()?;
    let client = if cmd.needs_signer() {
        let keypair: SharedSigner = Arc::new(cli::read_wallet_keypair(&args.keypair_path())?);
        VVallet::connected(&config, Some(keypair))?
            .ok_or_else(|| anyhow::anyhow!("wallet not connected"))?
    } else {
        VVallet::read_only(&config)?
    };

    let out = cli::run(&client, cmd).await?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
