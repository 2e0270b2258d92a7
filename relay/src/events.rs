//! Events emitted by a relay.

use crate::blocklist::BlockSource;
use crate::risk::RiskScore;
use dagshield_types::{ChainId, ReportId, TargetAddress, ThreatLevel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayEvent {
    CrossChainThreatReceived {
        report_id: ReportId,
        source_chain: ChainId,
        target: TargetAddress,
    },
    RiskScoreUpdated {
        target: TargetAddress,
        risk_score: RiskScore,
    },
    AddressBlocked {
        target: TargetAddress,
        threat_level: ThreatLevel,
        source: BlockSource,
    },
    AddressUnblocked {
        target: TargetAddress,
    },
}
