pub mod codec;
pub mod idl;
pub mod records;

pub use idl::{DecodedAccount, ProgramIdl, DISCRIMINATOR_LEN};
pub use records::{IdentityRecord, ProofRecord};
