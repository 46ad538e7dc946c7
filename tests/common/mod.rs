//! In-memory stand-in for an RPC node running the vvallet program.
//!
//! Transactions are signature-checked and executed with the same rules the
//! program enforces: new accounts must sign and must not exist yet, and a
//! proof can only be released by its owner. Every transport call is counted.

#![allow(dead_code)]

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use solana_program::hash::Hash;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vvallet_client::domain::DecodedAccount;
use vvallet_client::solana::{AccountFilter, RpcTransport, Wallet};
use vvallet_client::{ClientConfig, ProgramIdl, UnsignedPolicy, VVallet};

pub struct MockLedger {
    program_id: Pubkey,
    idl: ProgramIdl,
    accounts: Mutex<BTreeMap<Pubkey, Vec<u8>>>,
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        let idl = ProgramIdl::bundled().expect("bundled idl");
        Arc::new(Self {
            program_id: idl.address().expect("idl address"),
            idl,
            accounts: Mutex::new(BTreeMap::new()),
            calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        })
    }

    /// Number of transport calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn contains(&self, key: &Pubkey) -> bool {
        self.accounts.lock().unwrap().contains_key(key)
    }

    pub fn insert_raw(&self, key: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(key, data);
    }

    /// Makes every subsequent call fail as if the node were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn enter(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            bail!("error sending request: connection refused");
        }
        Ok(())
    }

    fn process(&self, tx: &Transaction) -> anyhow::Result<Signature> {
        tx.verify().map_err(|e| anyhow!("signature verification failed: {e}"))?;
        let message = &tx.message;

        let mut accounts = self.accounts.lock().unwrap();
        let mut staged = accounts.clone();

        for ix in &message.instructions {
            let program = message.account_keys[ix.program_id_index as usize];
            if program != self.program_id {
                bail!("unknown program {program}");
            }
            let keys: Vec<(Pubkey, bool)> = ix
                .accounts
                .iter()
                .map(|&i| (message.account_keys[i as usize], message.is_signer(i as usize)))
                .collect();
            let def = self
                .idl
                .instructions
                .iter()
                .find(|d| ix.data.len() >= 8 && d.discriminator()[..] == ix.data[..8])
                .ok_or_else(|| anyhow!("InstructionFallbackNotFound"))?;
            let args = def.decode_args(&ix.data)?;

            match def.name.as_str() {
                "register" => {
                    let (identity, owner) = create_roles(&keys, &staged)?;
                    let record = DecodedAccount::new().with("owner", owner).with("alias", args[0].clone());
                    staged.insert(identity, self.idl.account("identity")?.encode(&record)?);
                }
                "addProof" => {
                    let (proof, owner) = create_roles(&keys, &staged)?;
                    let record = DecodedAccount::new()
                        .with("owner", owner)
                        .with("kind", args[0].clone())
                        .with("proof", args[1].clone());
                    staged.insert(proof, self.idl.account("proof")?.encode(&record)?);
                }
                "releaseProof" => {
                    let (proof, _) = keys[0];
                    let (owner, owner_signed) = keys[1];
                    if !owner_signed {
                        bail!("AccountNotSigner: owner");
                    }
                    let data = staged
                        .get(&proof)
                        .ok_or_else(|| anyhow!("AccountNotInitialized: proof {proof}"))?;
                    let decoded = self.idl.account("proof")?.decode(data)?;
                    if decoded.pubkey("owner") != Some(owner) {
                        bail!("ConstraintHasOne: proof is not owned by {owner}");
                    }
                    staged.remove(&proof);
                }
                other => bail!("unhandled instruction {other}"),
            }
        }

        *accounts = staged;
        Ok(tx.signatures[0])
    }
}

/// Checks the (new account, owner) pair of a create instruction.
fn create_roles(keys: &[(Pubkey, bool)], staged: &BTreeMap<Pubkey, Vec<u8>>) -> anyhow::Result<(Pubkey, Pubkey)> {
    let (new_account, new_signed) = keys[0];
    let (owner, owner_signed) = keys[1];
    if !new_signed || !owner_signed {
        bail!("AccountNotSigner");
    }
    if staged.contains_key(&new_account) {
        bail!("Allocate: account Address {{ address: {new_account}, base: None }} already in use");
    }
    Ok((new_account, owner))
}

#[async_trait]
impl RpcTransport for MockLedger {
    async fn get_account_data(&self, address: &Pubkey) -> anyhow::Result<Vec<u8>> {
        self.enter()?;
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| anyhow!("AccountNotFound: pubkey={address}"))
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> anyhow::Result<Vec<(Pubkey, Vec<u8>)>> {
        self.enter()?;
        if *program_id != self.program_id {
            return Ok(Vec::new());
        }
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, data)| filters.iter().all(|f| f.matches(data)))
            .map(|(k, d)| (*k, d.clone()))
            .collect())
    }

    async fn get_latest_blockhash(&self) -> anyhow::Result<Hash> {
        self.enter()?;
        Ok(Hash::new_from_array([7u8; 32]))
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> anyhow::Result<Signature> {
        self.enter()?;
        self.process(transaction)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.enter()
    }
}

pub fn client(ledger: &Arc<MockLedger>, wallet: Wallet, unsigned_policy: UnsignedPolicy) -> VVallet {
    let config = ClientConfig {
        unsigned_policy,
        ..ClientConfig::default()
    };
    VVallet::with_transport(&config, wallet, ledger.clone(), "mock://ledger").expect("client")
}

/// Signing client plus its wallet's base58 key.
pub fn signing_client(ledger: &Arc<MockLedger>) -> (VVallet, String) {
    let keypair = Keypair::new();
    let wallet = Wallet::signing(keypair);
    let owner = wallet.pubkey().to_string();
    (client(ledger, wallet, UnsignedPolicy::Reject), owner)
}

pub fn read_only_client(ledger: &Arc<MockLedger>, unsigned_policy: UnsignedPolicy) -> VVallet {
    client(ledger, Wallet::ephemeral(), unsigned_policy)
}
