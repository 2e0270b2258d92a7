//! Node configuration with TOML file support.

use dagshield_registry::{AdminPolicy, AdminSet, ChainConfig, ChainSeed, SingleAdmin};
use dagshield_types::{ChainId, Identity, KeyPair, NetworkParams, MAX_CONFIDENCE};
use dagshield_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::NodeError;

/// Configuration for a DAGShield node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Hex seed of this node's signing key. A fresh key is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_seed: Option<String>,

    /// Hex identity of the administrative authority. Defaults to this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,

    /// Further hex identities sharing the administrative authority.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<String>,

    /// Hex identity relays accept alerts from. Defaults to this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagator: Option<String>,

    /// Hex identities authorized to report and vote at start-up.
    #[serde(default)]
    pub authorized: Vec<String>,

    /// Seconds between dispatch queue flushes.
    #[serde(default = "default_dispatch_interval_secs")]
    pub dispatch_interval_secs: u64,

    /// Messages delivered per chain per flush.
    #[serde(default = "default_dispatch_batch_size")]
    pub dispatch_batch_size: usize,

    /// Delivery attempts before a message is dropped.
    #[serde(default = "default_dispatch_max_attempts")]
    pub dispatch_max_attempts: u32,

    /// Automatic review agrees only above this confidence.
    #[serde(default = "default_review_confidence")]
    pub review_confidence: u8,

    /// Automatic review agrees only above this severity.
    #[serde(default = "default_review_min_level")]
    pub review_min_level: u8,

    /// Whether to keep Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Chains seeded into the configuration store at start-up.
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainSeed>,

    /// Network-wide consensus and risk parameters.
    #[serde(default)]
    pub params: NetworkParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dispatch_interval_secs() -> u64 {
    10
}

fn default_dispatch_batch_size() -> usize {
    10
}

fn default_dispatch_max_attempts() -> u32 {
    5
}

fn default_review_confidence() -> u8 {
    80
}

fn default_review_min_level() -> u8 {
    5
}

/// Ethereum, Polygon, BNB Chain, Arbitrum One, Optimism.
pub const DEFAULT_CHAINS: [u64; 5] = [1, 137, 56, 42161, 10];

fn default_chains() -> Vec<ChainSeed> {
    DEFAULT_CHAINS
        .iter()
        .map(|&id| ChainSeed {
            chain_id: ChainId::new(id),
            config: ChainConfig {
                active: true,
                min_confidence: 75,
                consensus_threshold: 3,
                relay_endpoint: None,
            },
        })
        .collect()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            NodeError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject settings the node cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.params.validate()?;
        if self.dispatch_interval_secs == 0 {
            return Err(NodeError::Config("dispatch_interval_secs must be non-zero".into()));
        }
        if self.dispatch_batch_size == 0 {
            return Err(NodeError::Config("dispatch_batch_size must be non-zero".into()));
        }
        if self.dispatch_max_attempts == 0 {
            return Err(NodeError::Config("dispatch_max_attempts must be non-zero".into()));
        }
        if self.review_confidence > MAX_CONFIDENCE {
            return Err(NodeError::Config(format!(
                "review_confidence {} exceeds {MAX_CONFIDENCE}",
                self.review_confidence
            )));
        }
        Ok(())
    }

    /// This node's key pair, from `node_seed` or freshly generated.
    pub fn node_keypair(&self) -> Result<KeyPair, NodeError> {
        match &self.node_seed {
            Some(seed) => Ok(dagshield_crypto::keypair_from_seed(&parse_hex32(seed)?)),
            None => dagshield_crypto::generate_keypair()
                .map_err(|e| NodeError::Config(format!("key generation failed: {e}"))),
        }
    }

    /// Administrator identity, defaulting to `node`.
    pub fn admin_identity(&self, node: Identity) -> Result<Identity, NodeError> {
        self.admin.as_deref().map_or(Ok(node), parse_identity)
    }

    /// The administrative authority: the primary administrator alone, or
    /// together with every identity listed in `admins`.
    pub fn admin_policy(&self, node: Identity) -> Result<Arc<dyn AdminPolicy>, NodeError> {
        let primary = self.admin_identity(node)?;
        if self.admins.is_empty() {
            return Ok(Arc::new(SingleAdmin::new(primary)));
        }
        let extra = self
            .admins
            .iter()
            .map(|s| parse_identity(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Arc::new(AdminSet::new(std::iter::once(primary).chain(extra))))
    }

    /// Propagation source identity, defaulting to `node`.
    pub fn propagator_identity(&self, node: Identity) -> Result<Identity, NodeError> {
        self.propagator.as_deref().map_or(Ok(node), parse_identity)
    }

    pub fn authorized_identities(&self) -> Result<Vec<Identity>, NodeError> {
        self.authorized.iter().map(|s| parse_identity(s)).collect()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            node_seed: None,
            admin: None,
            admins: Vec::new(),
            propagator: None,
            authorized: Vec::new(),
            dispatch_interval_secs: default_dispatch_interval_secs(),
            dispatch_batch_size: default_dispatch_batch_size(),
            dispatch_max_attempts: default_dispatch_max_attempts(),
            review_confidence: default_review_confidence(),
            review_min_level: default_review_min_level(),
            enable_metrics: false,
            chains: default_chains(),
            params: NetworkParams::default(),
        }
    }
}

/// Parse a 64-character hex identity.
pub fn parse_identity(s: &str) -> Result<Identity, NodeError> {
    parse_hex32(s).map(Identity::new)
}

fn parse_hex32(s: &str) -> Result<[u8; 32], NodeError> {
    let bytes = hex::decode(s.trim()).map_err(|e| NodeError::Config(format!("bad hex '{s}': {e}")))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| NodeError::Config(format!("expected 32 bytes, got {}", v.len())))
}
