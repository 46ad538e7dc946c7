pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::error::VValletError;
pub use app::vvallet::VVallet;
pub use crypto::alias::derive_alias_keypair;
pub use domain::{IdentityRecord, ProgramIdl, ProofRecord};
pub use infra::config::{ClientConfig, ClusterConfig, UnsignedPolicy};
pub use infra::solana;
