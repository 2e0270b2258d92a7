//! Network-wide consensus and risk parameters.
//!
//! Every node on the network must run with the same values; they are fixed at
//! start-up and only overridable through node configuration.

use crate::error::TypeError;
use crate::threat::ThreatLevel;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    // ── Consensus ────────────────────────────────────────────────────────
    /// Seconds after submission during which votes are accepted.
    pub consensus_window_secs: u64,

    /// Minimum agreeing votes (reporter included) for any chain, regardless
    /// of that chain's own threshold. The default of 3 means a reporter and a
    /// single colluding voter can never verify a report.
    pub min_quorum_floor: u32,

    /// Verified reports at or above this level are propagated cross-chain.
    pub high_severity_threshold: u8,

    // ── Risk engine ──────────────────────────────────────────────────────
    /// A single received alert at or above this level quarantines the target.
    pub auto_block_threshold: u8,

    /// Risk added per severity point of a newly processed alert.
    pub risk_per_level: u32,

    /// Upper bound of any address's risk score.
    pub max_risk_score: u32,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            consensus_window_secs: 300,
            min_quorum_floor: 3,
            high_severity_threshold: 7,
            auto_block_threshold: 8,
            risk_per_level: 10,
            max_risk_score: 1000,
        }
    }
}

impl NetworkParams {
    /// Reject parameter sets that would make consensus or blocking meaningless.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.consensus_window_secs == 0 {
            return Err(TypeError::InvalidParams(
                "consensus_window_secs must be non-zero".into(),
            ));
        }
        if self.min_quorum_floor == 0 {
            return Err(TypeError::InvalidParams(
                "min_quorum_floor must be non-zero".into(),
            ));
        }
        ThreatLevel::new(self.high_severity_threshold).map_err(|_| {
            TypeError::InvalidParams(format!(
                "high_severity_threshold {} is outside 1..=10",
                self.high_severity_threshold
            ))
        })?;
        ThreatLevel::new(self.auto_block_threshold).map_err(|_| {
            TypeError::InvalidParams(format!(
                "auto_block_threshold {} is outside 1..=10",
                self.auto_block_threshold
            ))
        })?;
        if self.max_risk_score == 0 {
            return Err(TypeError::InvalidParams(
                "max_risk_score must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Whether a verified report of this level propagates to other chains.
    pub fn is_high_severity(&self, level: ThreatLevel) -> bool {
        level.get() >= self.high_severity_threshold
    }

    /// Whether an alert of this level quarantines its target on receipt.
    pub fn triggers_auto_block(&self, level: ThreatLevel) -> bool {
        level.get() >= self.auto_block_threshold
    }
}
