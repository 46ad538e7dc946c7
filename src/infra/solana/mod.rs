pub mod client;
pub mod program;
pub mod wallet;

pub use client::{AccountFilter, RpcTransport, SolanaRpc};
pub use program::Program;
pub use wallet::{SharedSigner, Wallet};
