//! DAGShield node: hosts the consensus engine and the per-chain relays.
//!
//! The node is the coordinator that:
//! - Seeds the identity and chain registries from configuration
//! - Accepts signed threat reports and votes
//! - Turns propagation intents into encoded cross-chain messages
//! - Delivers queued messages to relays in batches, with retry
//! - Runs the automatic review heuristic for its own identity
//! - Publishes every state change on a broadcast event stream

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod message;
pub mod metrics;
pub mod node;
pub mod review;
pub mod shutdown;

pub use config::{parse_identity, NodeConfig, DEFAULT_CHAINS};
pub use dispatch::{DispatchQueue, PendingFrame, Retry};
pub use error::NodeError;
pub use events::NodeEvent;
pub use message::{threat_notice, CrossChainMessage, MessageKind};
pub use metrics::NodeMetrics;
pub use node::{DispatchReport, ThreatNode};
pub use review::ReviewPolicy;
pub use shutdown::{ShutdownController, ShutdownReason, ShutdownSignal};
