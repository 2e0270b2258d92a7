//! Events emitted by the consensus engine.
//!
//! Each event carries enough data to reconstruct the affected entity without a
//! follow-up read.

use dagshield_types::{ChainId, Identity, ReportId, TargetAddress, ThreatLevel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleEvent {
    ReportSubmitted {
        report_id: ReportId,
        chain_id: ChainId,
        target: TargetAddress,
        threat_level: ThreatLevel,
    },
    VoteCast {
        report_id: ReportId,
        voter: Identity,
        agree: bool,
        consensus_score: u32,
    },
    ReportVerified {
        report_id: ReportId,
        consensus_score: u32,
    },
    CrossChainAlertEmitted {
        target_chain: ChainId,
        report_id: ReportId,
        threat_level: ThreatLevel,
    },
}
