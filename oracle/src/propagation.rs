//! Cross-chain propagation intents.
//!
//! The consensus engine never calls a relay. It returns an ordered list of
//! intents; delivering them (with whatever retry policy the transport wants)
//! is the caller's job.

use dagshield_types::{ChainId, ReportId, TargetAddress, ThreatLevel, ThreatType, Timestamp};
use serde::{Deserialize, Serialize};

/// The alert payload a relay on another chain consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainAlert {
    pub source_chain: ChainId,
    pub report_id: ReportId,
    pub target: TargetAddress,
    pub threat_level: ThreatLevel,
    pub threat_type: ThreatType,
    pub verified_at: Timestamp,
}

/// Deliver `alert` to the relay of `target_chain`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationIntent {
    pub target_chain: ChainId,
    pub alert: CrossChainAlert,
}
