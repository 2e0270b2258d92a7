//! Fundamental types for the DAGShield threat-intelligence network.
//!
//! This crate defines the value types shared across every other crate in the workspace:
//! chain identifiers, target addresses, node identities, hashes, threat classification,
//! timestamps and the network-wide consensus parameters.

pub mod address;
pub mod chain;
pub mod error;
pub mod hash;
pub mod identity;
pub mod keys;
pub mod params;
pub mod report;
pub mod threat;
pub mod time;

pub use address::TargetAddress;
pub use chain::ChainId;
pub use error::TypeError;
pub use hash::{EvidenceHash, ReportId};
pub use identity::Identity;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::NetworkParams;
pub use report::ReportSubmission;
pub use threat::{validate_confidence, ThreatLevel, ThreatType, MAX_CONFIDENCE};
pub use time::{Clock, SystemClock, Timestamp};
