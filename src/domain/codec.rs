//! Borsh-compatible encoding for the primitive types the program IDL uses.
//!
//! Integers are little-endian, strings and byte vectors carry a `u32` length
//! prefix, public keys are their raw 32 bytes.

use serde::Deserialize;
use solana_program::pubkey::Pubkey;
use thiserror::Error;

/// Field/argument types understood by the client.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IdlType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I64,
    String,
    #[serde(alias = "pubkey")]
    PublicKey,
    Bytes,
}

impl IdlType {
    /// Encoded width for fixed-size types, `None` for length-prefixed ones.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            IdlType::Bool | IdlType::U8 => Some(1),
            IdlType::U16 => Some(2),
            IdlType::U32 => Some(4),
            IdlType::U64 | IdlType::I64 => Some(8),
            IdlType::PublicKey => Some(32),
            IdlType::String | IdlType::Bytes => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdlValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I64(i64),
    String(String),
    PublicKey(Pubkey),
    Bytes(Vec<u8>),
}

impl IdlValue {
    fn type_name(&self) -> &'static str {
        match self {
            IdlValue::Bool(_) => "bool",
            IdlValue::U8(_) => "u8",
            IdlValue::U16(_) => "u16",
            IdlValue::U32(_) => "u32",
            IdlValue::U64(_) => "u64",
            IdlValue::I64(_) => "i64",
            IdlValue::String(_) => "string",
            IdlValue::PublicKey(_) => "publicKey",
            IdlValue::Bytes(_) => "bytes",
        }
    }
}

impl From<&str> for IdlValue {
    fn from(s: &str) -> Self {
        IdlValue::String(s.to_string())
    }
}

impl From<Pubkey> for IdlValue {
    fn from(key: Pubkey) -> Self {
        IdlValue::PublicKey(key)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("type mismatch: expected {expected:?}, got {got}")]
    TypeMismatch { expected: IdlType, got: &'static str },
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("invalid bool byte {0}")]
    InvalidBool(u8),
    #[error("string is not valid utf-8")]
    InvalidUtf8,
    #[error("length {0} does not fit in u32")]
    TooLong(usize),
    #[error("expected {expected} values, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("discriminator mismatch for {0}")]
    Discriminator(String),
}

pub fn encode_value(ty: IdlType, value: &IdlValue, out: &mut Vec<u8>) -> Result<(), CodecError> {
    match (ty, value) {
        (IdlType::Bool, IdlValue::Bool(b)) => out.push(u8::from(*b)),
        (IdlType::U8, IdlValue::U8(n)) => out.push(*n),
        (IdlType::U16, IdlValue::U16(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (IdlType::U32, IdlValue::U32(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (IdlType::U64, IdlValue::U64(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (IdlType::I64, IdlValue::I64(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (IdlType::String, IdlValue::String(s)) => write_prefixed(s.as_bytes(), out)?,
        (IdlType::Bytes, IdlValue::Bytes(b)) => write_prefixed(b, out)?,
        (IdlType::PublicKey, IdlValue::PublicKey(k)) => out.extend_from_slice(k.as_ref()),
        (expected, v) => {
            return Err(CodecError::TypeMismatch {
                expected,
                got: v.type_name(),
            })
        }
    }
    Ok(())
}

fn write_prefixed(bytes: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
    let len = u32::try_from(bytes.len()).map_err(|_| CodecError::TooLong(bytes.len()))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

fn take<'a>(data: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if data.len() < n {
        return Err(CodecError::Truncated {
            needed: n,
            remaining: data.len(),
        });
    }
    let (head, tail) = data.split_at(n);
    *data = tail;
    Ok(head)
}

fn take_array<const N: usize>(data: &mut &[u8]) -> Result<[u8; N], CodecError> {
    let mut buf = [0u8; N];
    buf.copy_from_slice(take(data, N)?);
    Ok(buf)
}

/// Decodes one value and advances `data` past it.
pub fn decode_value(ty: IdlType, data: &mut &[u8]) -> Result<IdlValue, CodecError> {
    let value = match ty {
        IdlType::Bool => match take(data, 1)?[0] {
            0 => IdlValue::Bool(false),
            1 => IdlValue::Bool(true),
            b => return Err(CodecError::InvalidBool(b)),
        },
        IdlType::U8 => IdlValue::U8(take(data, 1)?[0]),
        IdlType::U16 => IdlValue::U16(u16::from_le_bytes(take_array(data)?)),
        IdlType::U32 => IdlValue::U32(u32::from_le_bytes(take_array(data)?)),
        IdlType::U64 => IdlValue::U64(u64::from_le_bytes(take_array(data)?)),
        IdlType::I64 => IdlValue::I64(i64::from_le_bytes(take_array(data)?)),
        IdlType::PublicKey => IdlValue::PublicKey(Pubkey::new_from_array(take_array(data)?)),
        IdlType::String => {
            let bytes = read_prefixed(data)?;
            let s = String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)?;
            IdlValue::String(s)
        }
        IdlType::Bytes => IdlValue::Bytes(read_prefixed(data)?.to_vec()),
    };
    Ok(value)
}

fn read_prefixed<'a>(data: &mut &'a [u8]) -> Result<&'a [u8], CodecError> {
    let len = u32::from_le_bytes(take_array(data)?) as usize;
    take(data, len)
}
