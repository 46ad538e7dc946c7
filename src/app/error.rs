use solana_sdk::signer::SignerError;
use thiserror::Error;

use crate::domain::codec::CodecError;
use crate::domain::idl::IdlError;

#[derive(Debug, Error)]
pub enum VValletError {
    /// A signer-requiring call was made with a wallet that cannot sign.
    #[error("no wallet connected")]
    NotConnected,
    #[error("invalid public key `{0}`")]
    InvalidPubkey(String),
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
    #[error(transparent)]
    Idl(#[from] IdlError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("account {account} is missing field `{field}`")]
    MissingField { account: String, field: &'static str },
    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),
    /// The RPC node or the program rejected the call. Passed through as-is.
    #[error("remote call failed: {0:#}")]
    Remote(#[source] anyhow::Error),
}

impl VValletError {
    /// True when a direct lookup failed because the account does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            VValletError::Remote(e) => {
                let msg = format!("{e:#}");
                msg.contains("AccountNotFound") || msg.contains("could not find account")
            }
            _ => false,
        }
    }
}

pub type Result<T, E = VValletError> = std::result::Result<T, E>;
