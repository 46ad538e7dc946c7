//! Deterministic keypairs for identity aliases.
//!
//! The identity account for an alias lives at the public key of a keypair
//! seeded with SHA-256 of the alias bytes, so anyone who knows the alias can
//! find the account again without an index.

use sha2::{Digest, Sha256};
use solana_sdk::signer::keypair::{keypair_from_seed, Keypair};

use crate::app::error::VValletError;

pub fn alias_seed(alias: &str) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&Sha256::digest(alias.as_bytes()));
    seed
}

/// Derives the keypair that owns the identity account for `alias`.
pub fn derive_alias_keypair(alias: &str) -> Result<Keypair, VValletError> {
    keypair_from_seed(&alias_seed(alias)).map_err(|e| VValletError::KeyDerivation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn same_alias_same_key() {
        let a = derive_alias_keypair("satoshi").unwrap();
        let b = derive_alias_keypair("satoshi").unwrap();
        assert_eq!(a.pubkey(), b.pubkey());
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn different_aliases_different_keys() {
        let a = derive_alias_keypair("alice").unwrap();
        let b = derive_alias_keypair("Alice").unwrap();
        let c = derive_alias_keypair("alice ").unwrap();
        assert_ne!(a.pubkey(), b.pubkey());
        assert_ne!(a.pubkey(), c.pubkey());
    }

    #[test]
    fn empty_alias_still_derives() {
        assert!(derive_alias_keypair("").is_ok());
    }
}
