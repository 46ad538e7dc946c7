//! The vvallet client facade.
//!
//! `VVallet` bundles a wallet, an RPC connection and a program handle, and
//! turns "register this alias" / "list this owner's proofs" into calls
//! against the program's `identity` and `proof` accounts.

use solana_program::pubkey::Pubkey;
use solana_program::system_program;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::app::error::{Result, VValletError};
use crate::crypto::alias::derive_alias_keypair;
use crate::domain::codec::IdlValue;
use crate::domain::idl::ProgramIdl;
use crate::domain::records::{IdentityRecord, ProofRecord};
use crate::infra::config::{ClientConfig, UnsignedPolicy};
use crate::infra::solana::{Program, RpcTransport, SharedSigner, SolanaRpc, Wallet};

const IX_REGISTER: &str = "register";
const IX_ADD_PROOF: &str = "addProof";
const IX_RELEASE_PROOF: &str = "releaseProof";

const ACCOUNT_IDENTITY: &str = "identity";
const ACCOUNT_PROOF: &str = "proof";
const OWNER_FIELD: &str = "owner";

/// Wallet + connection + program handle for one session.
#[derive(Clone)]
pub struct VVallet {
    wallet: Wallet,
    endpoint: String,
    program: Program,
    unsigned_policy: UnsignedPolicy,
}

impl VVallet {
    /// Client for contexts that never sign (API lookups, server rendering).
    ///
    /// Prefers the private cluster when configured. The wallet is a throwaway
    /// public key; any signer-requiring call fails locally.
    pub fn read_only(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.cluster.read_only_endpoint();
        let transport = Arc::new(SolanaRpc::new(&endpoint));
        Self::with_transport(config, Wallet::ephemeral(), transport, endpoint)
    }

    /// Client around a wallet the user connected.
    ///
    /// Returns `Ok(None)` while no wallet is connected; callers treat that as
    /// "not ready yet".
    pub fn connected(config: &ClientConfig, wallet: Option<SharedSigner>) -> Result<Option<Self>> {
        let Some(signer) = wallet else {
            return Ok(None);
        };
        let endpoint = config.cluster.wallet_endpoint();
        let transport = Arc::new(SolanaRpc::new(&endpoint));
        Self::with_transport(config, Wallet::Signing(signer), transport, endpoint).map(Some)
    }

    /// Client over any transport. `endpoint` is informational only.
    pub fn with_transport(
        config: &ClientConfig,
        wallet: Wallet,
        transport: Arc<dyn RpcTransport>,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let idl = config.load_idl()?;
        let program_id = config.resolve_program_id(&idl)?;
        Ok(Self {
            wallet,
            endpoint: endpoint.into(),
            program: Program::new(program_id, idl, transport),
            unsigned_policy: config.unsigned_policy,
        })
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn program_id(&self) -> Pubkey {
        self.program.id()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn idl(&self) -> &ProgramIdl {
        self.program.idl()
    }

    /// Signer for a creation path, or `None` when the policy says to skip.
    fn creation_signer(&self, operation: &'static str) -> Result<Option<&(dyn Signer + Send + Sync)>> {
        match self.wallet.signer() {
            Some(signer) => Ok(Some(signer)),
            None => match self.unsigned_policy {
                UnsignedPolicy::Reject => Err(VValletError::NotConnected),
                UnsignedPolicy::Skip => {
                    tracing::warn!(operation, "wallet not connected, skipping");
                    Ok(None)
                }
            },
        }
    }

    /// Registers `alias` to the connected wallet.
    ///
    /// The identity account lives at the alias-derived key, which co-signs
    /// the transaction. Registering an alias that is already taken fails
    /// remotely.
    pub async fn register_identity(&self, alias: &str) -> Result<Option<Signature>> {
        let Some(signer) = self.creation_signer("register_identity")? else {
            return Ok(None);
        };
        let alias_keys = derive_alias_keypair(alias)?;
        let accounts = HashMap::from([
            (ACCOUNT_IDENTITY, alias_keys.pubkey()),
            (OWNER_FIELD, signer.pubkey()),
            ("systemProgram", system_program::ID),
        ]);

        let signature = self
            .program
            .rpc(IX_REGISTER, &accounts, &[IdlValue::from(alias)], signer, &[&alias_keys])
            .await?;
        tracing::info!(alias, identity = %alias_keys.pubkey(), "identity registered");
        Ok(Some(signature))
    }

    pub async fn fetch_identity(&self, alias: &str) -> Result<IdentityRecord> {
        let address = derive_alias_keypair(alias)?.pubkey();
        let account = self.program.fetch(ACCOUNT_IDENTITY, &address).await?;
        IdentityRecord::from_account(&address, &account)
    }

    /// Every identity owned by `owner` (base58). Order is unspecified.
    pub async fn list_identities_by_owner(&self, owner: &str) -> Result<Vec<IdentityRecord>> {
        let owner = parse_pubkey(owner)?;
        self.program
            .all_where(ACCOUNT_IDENTITY, OWNER_FIELD, owner.as_ref())
            .await?
            .iter()
            .map(|(address, account)| IdentityRecord::from_account(address, account))
            .collect()
    }

    /// Stores a `(kind, proof)` pair owned by the connected wallet.
    ///
    /// The proof account gets a random key; the returned keypair's public
    /// key is the record id.
    pub async fn register_proof(&self, kind: &str, proof: &str) -> Result<Option<Keypair>> {
        let Some(signer) = self.creation_signer("register_proof")? else {
            return Ok(None);
        };
        let proof_keys = Keypair::new();
        let accounts = HashMap::from([
            (ACCOUNT_PROOF, proof_keys.pubkey()),
            (OWNER_FIELD, signer.pubkey()),
            ("systemProgram", system_program::ID),
        ]);

        self.program
            .rpc(
                IX_ADD_PROOF,
                &accounts,
                &[IdlValue::from(kind), IdlValue::from(proof)],
                signer,
                &[&proof_keys],
            )
            .await?;
        tracing::info!(kind, id = %proof_keys.pubkey(), "proof added");
        Ok(Some(proof_keys))
    }

    /// Every proof owned by `owner` (base58). Order is unspecified.
    pub async fn fetch_proofs_by_owner(&self, owner: &str) -> Result<Vec<ProofRecord>> {
        let owner = parse_pubkey(owner)?;
        self.program
            .all_where(ACCOUNT_PROOF, OWNER_FIELD, owner.as_ref())
            .await?
            .iter()
            .map(|(address, account)| ProofRecord::from_account(address, account))
            .collect()
    }

    /// Looks a proof up by its own id, not by its owner.
    pub async fn fetch_proof(&self, id: &str) -> Result<ProofRecord> {
        let address = parse_pubkey(id)?;
        let account = self.program.fetch(ACCOUNT_PROOF, &address).await?;
        ProofRecord::from_account(&address, &account)
    }

    /// Releases (closes) a proof account.
    ///
    /// Always fails with `NotConnected` when the wallet cannot sign, whatever
    /// the unsigned policy.
    pub async fn delete_proof(&self, record: &ProofRecord) -> Result<Signature> {
        let signer = self.wallet.signer().ok_or(VValletError::NotConnected)?;
        let accounts = HashMap::from([
            (ACCOUNT_PROOF, parse_pubkey(&record.id)?),
            (OWNER_FIELD, parse_pubkey(&record.owner)?),
        ]);

        let signature = self
            .program
            .rpc(IX_RELEASE_PROOF, &accounts, &[], signer, &[])
            .await?;
        tracing::info!(id = %record.id, "proof released");
        Ok(signature)
    }
}

pub fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s.trim()).map_err(|_| VValletError::InvalidPubkey(s.to_string()))
}
