//! Wallet capability: either it can sign, or it only has a public key.

use solana_program::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::fmt;
use std::sync::Arc;

pub type SharedSigner = Arc<dyn Signer + Send + Sync>;

#[derive(Clone)]
pub enum Wallet {
    /// Identity without signing capability (used for lookups only).
    ReadOnly(Pubkey),
    /// A connected wallet that can co-sign transactions.
    Signing(SharedSigner),
}

impl Wallet {
    /// Read-only wallet around a fresh throwaway key.
    pub fn ephemeral() -> Self {
        Wallet::ReadOnly(Keypair::new().pubkey())
    }

    pub fn signing(signer: impl Signer + Send + Sync + 'static) -> Self {
        Wallet::Signing(Arc::new(signer))
    }

    pub fn pubkey(&self) -> Pubkey {
        match self {
            Wallet::ReadOnly(key) => *key,
            Wallet::Signing(signer) => signer.pubkey(),
        }
    }

    pub fn signer(&self) -> Option<&(dyn Signer + Send + Sync)> {
        match self {
            Wallet::ReadOnly(_) => None,
            Wallet::Signing(signer) => Some(signer.as_ref()),
        }
    }

    pub fn can_sign(&self) -> bool {
        self.signer().is_some()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wallet::ReadOnly(key) => f.debug_tuple("ReadOnly").field(key).finish(),
            Wallet::Signing(signer) => f.debug_tuple("Signing").field(&signer.pubkey()).finish(),
        }
    }
}
