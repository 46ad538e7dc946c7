//! Command parsing and dispatch for the `vvallet` binary.

use clap::{Parser, Subcommand};
use serde_json::{json, Value as JsonValue};
use solana_sdk::signer::keypair::{read_keypair_file, Keypair};
use solana_sdk::signer::Signer;

use crate::app::vvallet::VVallet;

pub const ENV_KEYPAIR: &str = "VVALLET_KEYPAIR";
pub const DEFAULT_KEYPAIR: &str = "~/.config/solana/id.json";

#[derive(Parser, Debug, Clone)]
#[command(name = "vvallet", version, about = "Register and look up vvallet identities and proofs")]
pub struct Cli {
    /// Wallet keypair used to sign writes.
    #[arg(long, global = true, env = ENV_KEYPAIR, default_value = DEFAULT_KEYPAIR)]
    pub keypair: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Keypair path with `~` expanded.
    pub fn keypair_path(&self) -> String {
        shellexpand::tilde(&self.keypair).into_owned()
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register an alias to the wallet.
    Register { alias: String },

    /// Look up an alias.
    Identity { alias: String },

    /// List identities owned by a key.
    Identities { owner: String },

    /// Store a proof owned by the wallet.
    AddProof {
        /// Proof kind, e.g. `twitter`.
        kind: String,
        proof: String,
    },

    /// Look up a proof by id.
    Proof { id: String },

    /// List proofs owned by a key.
    Proofs { owner: String },

    /// Delete a proof owned by the wallet.
    ReleaseProof { id: String },
}

impl Command {
    /// Whether the command submits a transaction.
    pub fn needs_signer(&self) -> bool {
        matches!(
            self,
            Command::Register { .. } | Command::AddProof { .. } | Command::ReleaseProof { .. }
        )
    }
}

/// Runs one command and returns what should be printed.
pub async fn run(client: &VVallet, cmd: Command) -> anyhow::Result<JsonValue> {
    let out = match cmd {
        Command::Register { alias } => {
            let signature = client.register_identity(&alias).await?;
            json!({ "alias": alias, "signature": signature.map(|s| s.to_string()) })
        }
        Command::Identity { alias } => serde_json::to_value(client.fetch_identity(&alias).await?)?,
        Command::Identities { owner } => serde_json::to_value(client.list_identities_by_owner(&owner).await?)?,
        Command::AddProof { kind, proof } => {
            let keys = client.register_proof(&kind, &proof).await?;
            json!({ "id": keys.map(|k| k.pubkey().to_string()) })
        }
        Command::Proof { id } => serde_json::to_value(client.fetch_proof(&id).await?)?,
        Command::Proofs { owner } => serde_json::to_value(client.fetch_proofs_by_owner(&owner).await?)?,
        Command::ReleaseProof { id } => {
            let record = client.fetch_proof(&id).await?;
            let signature = client.delete_proof(&record).await?;
            json!({ "id": id, "signature": signature.to_string() })
        }
    };
    Ok(out)
}

pub fn read_wallet_keypair(path: &str) -> anyhow::Result<Keypair> {
    read_keypair_file(path).map_err(|e| anyhow::anyhow!("Failed to read keypair file {}: {}", path, e))
}
