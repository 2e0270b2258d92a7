//! Cross-chain message envelope.
//!
//! Everything handed to the transport is a [`CrossChainMessage`] encoded with
//! bincode; relays only ever see what survives a decode.

use dagshield_oracle::{CrossChainAlert, PropagationIntent};
use dagshield_relay::ThreatNotice;
use dagshield_types::{ChainId, TargetAddress, Timestamp};
use serde::{Deserialize, Serialize};

use crate::NodeError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// A verified high-severity report.
    ThreatAlert(CrossChainAlert),
    /// Quarantine `target` immediately on the receiving chain.
    EmergencyBlock { target: TargetAddress },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainMessage {
    pub source_chain: ChainId,
    pub target_chain: ChainId,
    pub kind: MessageKind,
    pub timestamp: Timestamp,
}

impl CrossChainMessage {
    pub fn threat_alert(intent: &PropagationIntent, timestamp: Timestamp) -> Self {
        Self {
            source_chain: intent.alert.source_chain,
            target_chain: intent.target_chain,
            kind: MessageKind::ThreatAlert(intent.alert.clone()),
            timestamp,
        }
    }

    pub fn emergency_block(
        source_chain: ChainId,
        target_chain: ChainId,
        target: TargetAddress,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            source_chain,
            target_chain,
            kind: MessageKind::EmergencyBlock { target },
            timestamp,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, NodeError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, NodeError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// What a relay is handed for a received alert.
pub fn threat_notice(alert: &CrossChainAlert) -> ThreatNotice {
    ThreatNotice {
        source_chain: alert.source_chain,
        report_id: alert.report_id,
        target: alert.target.clone(),
        threat_level: alert.threat_level.get(),
        threat_type: alert.threat_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagshield_types::{ReportId, ThreatLevel, ThreatType};

    fn intent() -> PropagationIntent {
        PropagationIntent {
            target_chain: ChainId::new(137),
            alert: CrossChainAlert {
                source_chain: ChainId::new(1),
                report_id: ReportId::new([3; 32]),
                target: TargetAddress::parse("0xBEEF").unwrap(),
                threat_level: ThreatLevel::new(9).unwrap(),
                threat_type: ThreatType::FlashLoanAttack,
                verified_at: Timestamp::new(42),
            },
        }
    }

    #[test]
    fn envelope_survives_the_wire() {
        let msg = CrossChainMessage::threat_alert(&intent(), Timestamp::new(50));
        let decoded = CrossChainMessage::decode(&msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.target_chain, ChainId::new(137));
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let bytes = CrossChainMessage::threat_alert(&intent(), Timestamp::new(50))
            .encode()
            .unwrap();
        let result = CrossChainMessage::decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(NodeError::Codec(_))));
    }

    #[test]
    fn notice_carries_alert_fields() {
        let notice = threat_notice(&intent().alert);
        assert_eq!(notice.threat_level, 9);
        assert_eq!(notice.target.as_str(), "0xbeef");
        assert_eq!(notice.source_chain, ChainId::new(1));
    }
}
