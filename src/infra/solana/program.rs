//! Typed handle to the on-chain program: instructions are encoded and
//! accounts decoded through the IDL, network calls go through the transport.

use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::sync::Arc;

use crate::app::error::{Result, VValletError};
use crate::domain::codec::IdlValue;
use crate::domain::idl::{DecodedAccount, ProgramIdl};
use crate::infra::solana::client::{AccountFilter, RpcTransport};

#[derive(Clone)]
pub struct Program {
    program_id: Pubkey,
    idl: Arc<ProgramIdl>,
    transport: Arc<dyn RpcTransport>,
}

impl Program {
    pub fn new(program_id: Pubkey, idl: Arc<ProgramIdl>, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            program_id,
            idl,
            transport,
        }
    }

    pub fn id(&self) -> Pubkey {
        self.program_id
    }

    pub fn idl(&self) -> &ProgramIdl {
        &self.idl
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    pub fn instruction(
        &self,
        name: &str,
        accounts: &HashMap<&str, Pubkey>,
        args: &[IdlValue],
    ) -> Result<Instruction> {
        Ok(self.idl.instruction(name)?.build(self.program_id, accounts, args)?)
    }

    /// Builds, signs and submits a single-instruction transaction.
    ///
    /// `payer` pays fees and signs first; `extra_signers` are the new
    /// accounts' keypairs the instruction requires.
    pub async fn rpc(
        &self,
        name: &str,
        accounts: &HashMap<&str, Pubkey>,
        args: &[IdlValue],
        payer: &(dyn Signer + Send + Sync),
        extra_signers: &[&(dyn Signer + Send + Sync)],
    ) -> Result<Signature> {
        let instruction = self.instruction(name, accounts, args)?;
        let mut transaction = Transaction::new_with_payer(&[instruction], Some(&payer.pubkey()));
        let recent_blockhash = self
            .transport
            .get_latest_blockhash()
            .await
            .map_err(VValletError::Remote)?;
        {
            let mut signers: Vec<&dyn Signer> = Vec::with_capacity(1 + extra_signers.len());
            signers.push(payer);
            signers.extend(extra_signers.iter().map(|s| *s as &dyn Signer));
            transaction.try_sign(&signers, recent_blockhash)?;
        }

        let signature = self
            .transport
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(VValletError::Remote)?;
        tracing::debug!(instruction = name, %signature, "transaction confirmed");
        Ok(signature)
    }

    /// Direct lookup of one account of type `account`.
    pub async fn fetch(&self, account: &str, address: &Pubkey) -> Result<DecodedAccount> {
        let def = self.idl.account(account)?;
        let data = self
            .transport
            .get_account_data(address)
            .await
            .map_err(VValletError::Remote)?;
        Ok(def.decode(&data)?)
    }

    /// Scans all accounts of type `account` whose `field` equals `value`.
    ///
    /// The account discriminator is always added as a filter so other
    /// account types never match. Accounts that fail to decode are skipped.
    pub async fn all_where(
        &self,
        account: &str,
        field: &str,
        value: &[u8],
    ) -> Result<Vec<(Pubkey, DecodedAccount)>> {
        let def = self.idl.account(account)?;
        let filters = [
            AccountFilter::Memcmp {
                offset: 0,
                bytes: def.discriminator().to_vec(),
            },
            AccountFilter::Memcmp {
                offset: def.field_offset(field)?,
                bytes: value.to_vec(),
            },
        ];
        let raw = self
            .transport
            .get_program_accounts(&self.program_id, &filters)
            .await
            .map_err(VValletError::Remote)?;
        tracing::debug!(account, field, matches = raw.len(), "program account scan");

        let mut out = Vec::with_capacity(raw.len());
        for (address, data) in raw {
            match def.decode(&data) {
                Ok(decoded) => out.push((address, decoded)),
                Err(e) => tracing::warn!(%address, error = %e, "skipping undecodable account"),
            }
        }
        Ok(out)
    }
}
