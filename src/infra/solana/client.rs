// Responsible for all communication with the Solana blockchain.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_program::hash::Hash;
use solana_program::pubkey::Pubkey;
use solana_sdk::{commitment_config::CommitmentConfig, signature::Signature, transaction::Transaction};

/// Server-side filter applied to a program account scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    /// Account data at `offset` must equal `bytes`.
    Memcmp { offset: usize, bytes: Vec<u8> },
}

impl AccountFilter {
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::Memcmp { offset, bytes } => data
                .get(*offset..offset.saturating_add(bytes.len()))
                .is_some_and(|window| window == bytes.as_slice()),
        }
    }
}

/// The network operations the client needs. One call is one round-trip.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Raw data of the account at `address`; fails when it does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> anyhow::Result<Vec<u8>>;

    /// All accounts owned by `program_id` passing every filter, in whatever
    /// order the node returns them.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> anyhow::Result<Vec<(Pubkey, Vec<u8>)>>;

    async fn get_latest_blockhash(&self) -> anyhow::Result<Hash>;

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> anyhow::Result<Signature>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> anyhow::Result<()>;
}

/// `RpcTransport` over the nonblocking JSON-RPC client.
pub struct SolanaRpc {
    client: RpcClient,
}

impl SolanaRpc {
    pub fn new(rpc_url: &str) -> Self {
        let client = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());
        Self { client }
    }

    pub fn inner(&self) -> &RpcClient {
        &self.client
    }
}

#[async_trait]
impl RpcTransport for SolanaRpc {
    async fn get_account_data(&self, address: &Pubkey) -> anyhow::Result<Vec<u8>> {
        let account = self.client.get_account(address).await?;
        Ok(account.data)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> anyhow::Result<Vec<(Pubkey, Vec<u8>)>> {
        let filters = filters
            .iter()
            .map(|f| match f {
                AccountFilter::Memcmp { offset, bytes } => {
                    RpcFilterType::Memcmp(Memcmp::new_base58_encoded(*offset, bytes))
                }
            })
            .collect::<Vec<_>>();
        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                commitment: Some(self.client.commitment()),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .client
            .get_program_accounts_with_config(program_id, config)
            .await?;
        Ok(accounts.into_iter().map(|(key, acc)| (key, acc.data)).collect())
    }

    async fn get_latest_blockhash(&self) -> anyhow::Result<Hash> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> anyhow::Result<Signature> {
        Ok(self.client.send_and_confirm_transaction(transaction).await?)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.client.get_version().await?;
        Ok(())
    }
}
