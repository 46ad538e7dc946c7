//! Plain records handed to callers (UI, API). These shapes are the wire
//! contract: every key is a base58 string.

use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;
use utoipa::ToSchema;

use crate::app::error::{Result, VValletError};
use crate::domain::idl::DecodedAccount;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct IdentityRecord {
    /// Wallet that registered the alias.
    pub owner: String,
    pub alias: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ProofRecord {
    /// Public key of the proof account itself.
    pub id: String,
    pub owner: String,
    pub kind: String,
    pub proof: String,
}

impl IdentityRecord {
    pub fn from_account(address: &Pubkey, account: &DecodedAccount) -> Result<Self> {
        Ok(Self {
            owner: pubkey_field(address, account, "owner")?.to_string(),
            alias: string_field(address, account, "alias")?,
        })
    }
}

impl ProofRecord {
    pub fn from_account(address: &Pubkey, account: &DecodedAccount) -> Result<Self> {
        Ok(Self {
            id: address.to_string(),
            owner: pubkey_field(address, account, "owner")?.to_string(),
            kind: string_field(address, account, "kind")?,
            proof: string_field(address, account, "proof")?,
        })
    }
}

fn pubkey_field(address: &Pubkey, account: &DecodedAccount, field: &'static str) -> Result<Pubkey> {
    account.pubkey(field).ok_or_else(|| VValletError::MissingField {
        account: address.to_string(),
        field,
    })
}

fn string_field(address: &Pubkey, account: &DecodedAccount, field: &'static str) -> Result<String> {
    account
        .string(field)
        .map(str::to_string)
        .ok_or_else(|| VValletError::MissingField {
            account: address.to_string(),
            field,
        })
}
