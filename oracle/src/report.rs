//! Ledger entries.

use dagshield_types::{
    ChainId, EvidenceHash, Identity, ReportId, TargetAddress, ThreatLevel, ThreatType, Timestamp,
};
use serde::{Deserialize, Serialize};

/// A submitted threat observation as recorded in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub report_id: ReportId,
    pub source_chain: ChainId,
    pub target: TargetAddress,
    pub threat_level: ThreatLevel,
    pub threat_type: ThreatType,
    pub evidence_hash: EvidenceHash,
    pub confidence: u8,
    pub reporter: Identity,
    /// Immutable creation time; anchors the voting window.
    pub submitted_at: Timestamp,
    /// Agreeing votes so far, the reporter's own submission included.
    pub consensus_score: u32,
    /// Only ever moves false → true.
    pub verified: bool,
    pub verified_at: Option<Timestamp>,
}

/// Where a report stands at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Unverified, voting window still open.
    Pending,
    /// Reached quorum. Terminal.
    Verified,
    /// Window closed without quorum. Terminal; the report is stale.
    Expired,
}

impl ThreatReport {
    pub fn status(&self, now: Timestamp, window_secs: u64) -> ReportStatus {
        if self.verified {
            ReportStatus::Verified
        } else if self.submitted_at.window_closed(window_secs, now) {
            ReportStatus::Expired
        } else {
            ReportStatus::Pending
        }
    }

    /// Last instant at which a vote is still accepted.
    pub fn voting_deadline(&self, window_secs: u64) -> Timestamp {
        Timestamp::new(self.submitted_at.as_secs().saturating_add(window_secs))
    }
}
