//! The reporter-side view of a threat observation, before it enters the ledger.

use crate::address::TargetAddress;
use crate::chain::ChainId;
use crate::hash::EvidenceHash;
use crate::threat::ThreatType;
use serde::{Deserialize, Serialize};

/// Fields a reporting node submits, together with a signature over all of
/// them except `confidence`.
///
/// `threat_level` and `confidence` are raw so that range violations reach the
/// consensus engine and are rejected there with a named error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub chain_id: ChainId,
    pub target: TargetAddress,
    pub threat_level: u8,
    pub threat_type: ThreatType,
    pub evidence_hash: EvidenceHash,
    /// Opaque score from the reporter's own detection pipeline.
    pub confidence: u8,
}
