//! Cross-chain threats as seen by a receiving chain.

use dagshield_types::{ChainId, ReportId, TargetAddress, ThreatLevel, ThreatType, Timestamp};
use serde::{Deserialize, Serialize};

/// Idempotency key for relay processing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThreatKey {
    pub source_chain: ChainId,
    pub report_id: ReportId,
    pub target: TargetAddress,
}

/// An alert as delivered by the transport, before validation.
///
/// The level is kept raw so that a corrupted or hostile delivery is rejected
/// by the relay rather than trusted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatNotice {
    pub source_chain: ChainId,
    pub report_id: ReportId,
    pub target: TargetAddress,
    pub threat_level: u8,
    pub threat_type: ThreatType,
}

impl ThreatNotice {
    pub fn key(&self) -> ThreatKey {
        ThreatKey {
            source_chain: self.source_chain,
            report_id: self.report_id,
            target: self.target.clone(),
        }
    }
}

/// A processed cross-chain threat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainThreat {
    pub key: ThreatKey,
    pub threat_level: ThreatLevel,
    pub threat_type: ThreatType,
    pub received_at: Timestamp,
    pub processed: bool,
}
