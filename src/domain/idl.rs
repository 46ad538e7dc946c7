//! Anchor-style interface definition for the vvallet program.
//!
//! Call sites never hardcode byte layouts: discriminators, account-meta order
//! and field offsets are all derived from the IDL loaded here.

use crate::domain::codec::{self, CodecError, IdlType, IdlValue};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Width of the type tag Anchor prefixes to instruction data and account data.
pub const DISCRIMINATOR_LEN: usize = 8;

const BUNDLED_IDL: &str = include_str!("../../idl/vvallet.json");

#[derive(Debug, Error)]
pub enum IdlError {
    #[error("failed to parse IDL: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read IDL file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IDL has no instruction named `{0}`")]
    UnknownInstruction(String),
    #[error("IDL has no account named `{0}`")]
    UnknownAccount(String),
    #[error("instruction `{instruction}` needs account `{role}`")]
    MissingRole { instruction: String, role: String },
    #[error("account `{account}` has no field `{field}`")]
    UnknownField { account: String, field: String },
    #[error("field `{field}` of `{account}` follows a variable-size field and has no fixed offset")]
    NoFixedOffset { account: String, field: String },
    #[error("IDL metadata has no valid program address")]
    MissingAddress,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Discriminator = [u8; DISCRIMINATOR_LEN];

#[derive(Deserialize, Debug, Clone)]
pub struct ProgramIdl {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub instructions: Vec<IdlInstruction>,
    #[serde(default)]
    pub accounts: Vec<IdlAccountDef>,
    #[serde(default)]
    pub metadata: Option<IdlMetadata>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdlMetadata {
    pub address: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IdlAccountRole {
    pub name: String,
    #[serde(default)]
    pub is_mut: bool,
    #[serde(default)]
    pub is_signer: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlType,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdlInstruction {
    pub name: String,
    pub accounts: Vec<IdlAccountRole>,
    #[serde(default)]
    pub args: Vec<IdlField>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdlAccountDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlStruct,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdlStruct {
    pub kind: String,
    pub fields: Vec<IdlField>,
}

/// Account data decoded field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedAccount(BTreeMap<String, IdlValue>);

impl DecodedAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<IdlValue>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&IdlValue> {
        self.0.get(field)
    }

    pub fn pubkey(&self, field: &str) -> Option<Pubkey> {
        match self.0.get(field) {
            Some(IdlValue::PublicKey(k)) => Some(*k),
            _ => None,
        }
    }

    pub fn string(&self, field: &str) -> Option<&str> {
        match self.0.get(field) {
            Some(IdlValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl ProgramIdl {
    pub fn from_json(json: &str) -> Result<Self, IdlError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, IdlError> {
        let json = std::fs::read_to_string(path).map_err(|source| IdlError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The IDL shipped with this crate.
    pub fn bundled() -> Result<Self, IdlError> {
        Self::from_json(BUNDLED_IDL)
    }

    /// Program address recorded in the IDL metadata.
    pub fn address(&self) -> Result<Pubkey, IdlError> {
        self.metadata
            .as_ref()
            .and_then(|m| m.address.as_deref())
            .and_then(|a| Pubkey::from_str(a).ok())
            .ok_or(IdlError::MissingAddress)
    }

    pub fn instruction(&self, name: &str) -> Result<&IdlInstruction, IdlError> {
        self.instructions
            .iter()
            .find(|ix| ix.name == name)
            .ok_or_else(|| IdlError::UnknownInstruction(name.to_string()))
    }

    /// Looks up an account type by its IDL name (`Identity`) or its
    /// client-facing lower camel form (`identity`).
    pub fn account(&self, name: &str) -> Result<&IdlAccountDef, IdlError> {
        self.accounts
            .iter()
            .find(|acc| acc.name == name || lower_first(&acc.name) == name)
            .ok_or_else(|| IdlError::UnknownAccount(name.to_string()))
    }
}

impl IdlInstruction {
    pub fn discriminator(&self) -> Discriminator {
        sighash("global", &to_snake_case(&self.name))
    }

    pub fn encode_args(&self, args: &[IdlValue]) -> Result<Vec<u8>, IdlError> {
        if args.len() != self.args.len() {
            return Err(CodecError::Arity {
                expected: self.args.len(),
                got: args.len(),
            }
            .into());
        }
        let mut data = self.discriminator().to_vec();
        for (field, value) in self.args.iter().zip(args) {
            codec::encode_value(field.ty, value, &mut data)?;
        }
        Ok(data)
    }

    pub fn decode_args(&self, data: &[u8]) -> Result<Vec<IdlValue>, IdlError> {
        let mut cursor = strip_discriminator(data, &self.discriminator(), &self.name)?;
        let mut values = Vec::with_capacity(self.args.len());
        for field in &self.args {
            values.push(codec::decode_value(field.ty, &mut cursor)?);
        }
        Ok(values)
    }

    /// Builds the instruction with account metas in IDL order.
    ///
    /// `accounts` maps role names (e.g. `owner`) to keys; every role the IDL
    /// lists must be present.
    pub fn build(
        &self,
        program_id: Pubkey,
        accounts: &HashMap<&str, Pubkey>,
        args: &[IdlValue],
    ) -> Result<Instruction, IdlError> {
        let mut metas = Vec::with_capacity(self.accounts.len());
        for role in &self.accounts {
            let key = accounts
                .get(role.name.as_str())
                .ok_or_else(|| IdlError::MissingRole {
                    instruction: self.name.clone(),
                    role: role.name.clone(),
                })?;
            metas.push(if role.is_mut {
                AccountMeta::new(*key, role.is_signer)
            } else {
                AccountMeta::new_readonly(*key, role.is_signer)
            });
        }
        Ok(Instruction {
            program_id,
            accounts: metas,
            data: self.encode_args(args)?,
        })
    }
}

impl IdlAccountDef {
    pub fn discriminator(&self) -> Discriminator {
        sighash("account", &self.name)
    }

    pub fn decode(&self, data: &[u8]) -> Result<DecodedAccount, IdlError> {
        let mut cursor = strip_discriminator(data, &self.discriminator(), &self.name)?;
        let mut decoded = DecodedAccount::new();
        for field in &self.ty.fields {
            let value = codec::decode_value(field.ty, &mut cursor)?;
            decoded.0.insert(field.name.clone(), value);
        }
        Ok(decoded)
    }

    pub fn encode(&self, account: &DecodedAccount) -> Result<Vec<u8>, IdlError> {
        let mut data = self.discriminator().to_vec();
        for field in &self.ty.fields {
            let value = account.get(&field.name).ok_or_else(|| IdlError::UnknownField {
                account: self.name.clone(),
                field: field.name.clone(),
            })?;
            codec::encode_value(field.ty, value, &mut data)?;
        }
        Ok(data)
    }

    /// Byte offset of `field` inside the raw account data, for memcmp filters.
    pub fn field_offset(&self, field: &str) -> Result<usize, IdlError> {
        if !self.ty.fields.iter().any(|f| f.name == field) {
            return Err(IdlError::UnknownField {
                account: self.name.clone(),
                field: field.to_string(),
            });
        }
        let mut offset = DISCRIMINATOR_LEN;
        for f in &self.ty.fields {
            if f.name == field {
                return Ok(offset);
            }
            offset += f.ty.fixed_size().ok_or_else(|| IdlError::NoFixedOffset {
                account: self.name.clone(),
                field: field.to_string(),
            })?;
        }
        Err(IdlError::UnknownField {
            account: self.name.clone(),
            field: field.to_string(),
        })
    }
}

fn strip_discriminator<'a>(
    data: &'a [u8],
    expected: &Discriminator,
    name: &str,
) -> Result<&'a [u8], CodecError> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(CodecError::Truncated {
            needed: DISCRIMINATOR_LEN,
            remaining: data.len(),
        });
    }
    let (tag, rest) = data.split_at(DISCRIMINATOR_LEN);
    if tag != expected {
        return Err(CodecError::Discriminator(name.to_string()));
    }
    Ok(rest)
}

fn sighash(namespace: &str, name: &str) -> Discriminator {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
