use solana_sdk::signer::Signer;

use clap::Parser;
use vvallet_client::app::cli;
use vvallet_client::infra::config::ClientConfig;
use vvallet_client::solana::SolanaRpc;

/// Checks that the cluster, the program and the wallet are usable.
///
/// Endpoint and program settings come from the same env vars as the client
/// (`CLUSTER_URL`, `PRIVATE_CLUSTER_URL`, `PRIVATE_CLUSTER_KEY`,
/// `VVALLET_PROGRAM_ID`, `VVALLET_IDL_PATH`).
#[derive(Parser, Debug)]
#[command(name = "preflight")]
struct Args {
    /// Use the read-only endpoint and skip the wallet checks.
    #[arg(long)]
    read_only: bool,

    /// Wallet keypair whose balance is checked.
    #[arg(long, env = cli::ENV_KEYPAIR, default_value = cli::DEFAULT_KEYPAIR)]
    keypair: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let read_only = args.read_only;

    let cfg = ClientConfig::from_env()?;
    let idl = cfg.load_idl()?;
    let program_id = cfg.resolve_program_id(&idl)?;
    let rpc_url = if read_only {
        cfg.cluster.read_only_endpoint()
    } else {
        cfg.cluster.wallet_endpoint()
    };

    println!("> Preflight:");
    println!("  IDL: {} ({} instructions, {} account types)", idl.name, idl.instructions.len(), idl.accounts.len());
    println!("  Program id: {}", program_id);
    println!("  Read-only: {}", read_only);

    let rpc = SolanaRpc::new(&rpc_url);
    let client = rpc.inner();

    // Basic RPC connectivity
    let version = client.get_version().await?;
    println!("  RPC version: {}", version.solana_core);

    // Program account existence
    let program_acct = client
        .get_account(&program_id)
        .await
        .map_err(|e| anyhow::anyhow!("Program account not found on cluster: {} ({})", program_id, e))?;
    if !program_acct.executable {
        eprintln!("  Warning: program account exists but is not marked executable.");
    } else {
        println!("  Program account is deployed + executable.");
    }

    if !read_only {
        let keypair_path = shellexpand::tilde(&args.keypair).into_owned();
        let payer = cli::read_wallet_keypair(&keypair_path)?;
        let balance_lamports = client.get_balance(&payer.pubkey()).await?;
        let sol = balance_lamports as f64 / 1_000_000_000_f64;
        println!("  Wallet: {}", payer.pubkey());
        println!("  Wallet balance: {} lamports (~{:.6} SOL)", balance_lamports, sol);
        if balance_lamports < 10_000_000 {
            eprintln!("  Warning: wallet balance looks low; account creation may fail.");
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
