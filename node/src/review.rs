//! Automatic review of reports awaiting this node's vote.

use dagshield_oracle::ThreatReport;

/// Agrees with a report only when both its confidence and its severity are
/// strictly above the configured cut-offs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewPolicy {
    pub min_confidence: u8,
    pub min_level: u8,
}

impl ReviewPolicy {
    pub fn new(min_confidence: u8, min_level: u8) -> Self {
        Self {
            min_confidence,
            min_level,
        }
    }

    pub fn agrees(&self, report: &ThreatReport) -> bool {
        report.confidence > self.min_confidence && report.threat_level.get() > self.min_level
    }
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self::new(80, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagshield_types::{
        ChainId, EvidenceHash, Identity, ReportId, TargetAddress, ThreatLevel, ThreatType, Timestamp,
    };

    fn report(confidence: u8, level: u8) -> ThreatReport {
        ThreatReport {
            report_id: ReportId::new([1; 32]),
            source_chain: ChainId::new(1),
            target: TargetAddress::parse("0xabc").unwrap(),
            threat_level: ThreatLevel::new(level).unwrap(),
            threat_type: ThreatType::Phishing,
            evidence_hash: EvidenceHash::new([2; 32]),
            confidence,
            reporter: Identity::new([3; 32]),
            submitted_at: Timestamp::new(0),
            consensus_score: 1,
            verified: false,
            verified_at: None,
        }
    }

    #[test]
    fn cut_offs_are_exclusive() {
        let policy = ReviewPolicy::default();
        assert!(policy.agrees(&report(81, 6)));
        assert!(!policy.agrees(&report(80, 9)));
        assert!(!policy.agrees(&report(95, 5)));
    }
}
