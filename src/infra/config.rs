//! Centralized configuration (environment variables + defaults).
//!
//! `ClientConfig::from_env` is the only place the client reads the
//! environment; everything else takes the struct.

use solana_program::pubkey::Pubkey;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::app::error::{Result, VValletError};
use crate::domain::idl::ProgramIdl;

/// Used when no endpoint is configured at all.
pub const LOCAL_CLUSTER_URL: &str = "http://127.0.0.1:8899";

pub const ENV_PRIVATE_CLUSTER_URL: &str = "PRIVATE_CLUSTER_URL";
pub const ENV_PRIVATE_CLUSTER_KEY: &str = "PRIVATE_CLUSTER_KEY";
pub const ENV_CLUSTER_URL: &str = "CLUSTER_URL";
pub const ENV_PROGRAM_ID: &str = "VVALLET_PROGRAM_ID";
pub const ENV_IDL_PATH: &str = "VVALLET_IDL_PATH";
pub const ENV_UNSIGNED_POLICY: &str = "VVALLET_UNSIGNED_POLICY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Private RPC endpoint, only used by read-only clients.
    pub private_endpoint: Option<String>,
    /// Access key appended to the private endpoint as a path segment.
    pub private_key: Option<String>,
    pub public_endpoint: Option<String>,
}

impl ClusterConfig {
    /// Endpoint for read-only clients:
    /// private endpoint + key > private endpoint > public endpoint > local.
    pub fn read_only_endpoint(&self) -> String {
        match (non_empty(&self.private_endpoint), non_empty(&self.private_key)) {
            (Some(url), Some(key)) => format!("{}/{}", url.trim_end_matches('/'), key),
            (Some(url), None) => url.to_string(),
            _ => self.wallet_endpoint(),
        }
    }

    /// Endpoint for wallet-connected clients. The private cluster is never
    /// used here since its key would end up in the browser.
    pub fn wallet_endpoint(&self) -> String {
        non_empty(&self.public_endpoint)
            .unwrap_or(LOCAL_CLUSTER_URL)
            .to_string()
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// What signer-requiring calls do when the wallet cannot sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsignedPolicy {
    /// Fail with `NotConnected`.
    #[default]
    Reject,
    /// Log and return `Ok(None)` from the register paths. Deleting a proof
    /// still fails.
    Skip,
}

impl FromStr for UnsignedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(UnsignedPolicy::Reject),
            "skip" => Ok(UnsignedPolicy::Skip),
            other => Err(format!("unknown unsigned policy `{other}` (expected reject|skip)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub cluster: ClusterConfig,
    /// Overrides the address recorded in the IDL metadata.
    pub program_id: Option<Pubkey>,
    /// Loads the IDL from disk instead of the bundled copy.
    pub idl_path: Option<PathBuf>,
    pub unsigned_policy: UnsignedPolicy,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let program_id = match var(ENV_PROGRAM_ID) {
            Some(id) => Some(
                Pubkey::from_str(id.trim())
                    .map_err(|e| anyhow::anyhow!("{} is not a valid pubkey: {}", ENV_PROGRAM_ID, e))?,
            ),
            None => None,
        };
        let unsigned_policy = match var(ENV_UNSIGNED_POLICY) {
            Some(p) => p.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            None => UnsignedPolicy::default(),
        };

        Ok(Self {
            cluster: ClusterConfig {
                private_endpoint: var(ENV_PRIVATE_CLUSTER_URL),
                private_key: var(ENV_PRIVATE_CLUSTER_KEY),
                public_endpoint: var(ENV_CLUSTER_URL),
            },
            program_id,
            idl_path: var(ENV_IDL_PATH).map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned())),
            unsigned_policy,
        })
    }

    pub fn load_idl(&self) -> Result<Arc<ProgramIdl>> {
        let idl = match &self.idl_path {
            Some(path) => ProgramIdl::from_file(path)?,
            None => ProgramIdl::bundled()?,
        };
        Ok(Arc::new(idl))
    }

    pub fn resolve_program_id(&self, idl: &ProgramIdl) -> Result<Pubkey> {
        match self.program_id {
            Some(id) => Ok(id),
            None => idl.address().map_err(VValletError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(private: Option<&str>, key: Option<&str>, public: Option<&str>) -> ClusterConfig {
        ClusterConfig {
            private_endpoint: private.map(str::to_string),
            private_key: key.map(str::to_string),
            public_endpoint: public.map(str::to_string),
        }
    }

    #[test]
    fn private_endpoint_with_key_wins() {
        let c = cluster(Some("https://rpc.example.com"), Some("abc123"), Some("https://public"));
        assert_eq!(c.read_only_endpoint(), "https://rpc.example.com/abc123");
    }

    #[test]
    fn trailing_slash_is_not_doubled() {
        let c = cluster(Some("https://rpc.example.com/"), Some("abc123"), None);
        assert_eq!(c.read_only_endpoint(), "https://rpc.example.com/abc123");
    }

    #[test]
    fn private_endpoint_alone() {
        let c = cluster(Some("https://rpc.example.com"), None, Some("https://public"));
        assert_eq!(c.read_only_endpoint(), "https://rpc.example.com");
    }

    #[test]
    fn key_without_private_endpoint_is_ignored() {
        let c = cluster(None, Some("abc123"), Some("https://public"));
        assert_eq!(c.read_only_endpoint(), "https://public");
    }

    #[test]
    fn falls_back_to_local() {
        assert_eq!(ClusterConfig::default().read_only_endpoint(), LOCAL_CLUSTER_URL);
        assert_eq!(cluster(Some("  "), None, Some("")).read_only_endpoint(), LOCAL_CLUSTER_URL);
    }

    #[test]
    fn wallet_endpoint_ignores_private_cluster() {
        let c = cluster(Some("https://rpc.example.com"), Some("abc123"), None);
        assert_eq!(c.wallet_endpoint(), LOCAL_CLUSTER_URL);
        let c = cluster(Some("https://rpc.example.com"), Some("abc123"), Some("https://public"));
        assert_eq!(c.wallet_endpoint(), "https://public");
    }

    #[test]
    fn policy_parses() {
        assert_eq!("skip".parse::<UnsignedPolicy>(), Ok(UnsignedPolicy::Skip));
        assert_eq!(" Reject ".parse::<UnsignedPolicy>(), Ok(UnsignedPolicy::Reject));
        assert!("later".parse::<UnsignedPolicy>().is_err());
    }

    #[test]
    fn program_id_override_beats_idl() {
        let idl = ProgramIdl::bundled().unwrap();
        let override_id = Pubkey::new_unique();
        let cfg = ClientConfig {
            program_id: Some(override_id),
            ..ClientConfig::default()
        };
        assert_eq!(cfg.resolve_program_id(&idl).unwrap(), override_id);
        assert_eq!(
            ClientConfig::default().resolve_program_id(&idl).unwrap(),
            idl.address().unwrap()
        );
    }
}
