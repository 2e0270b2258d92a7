//! Bounded per-address risk accumulator.

use dagshield_types::{NetworkParams, ThreatLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u32);

impl RiskScore {
    pub const ZERO: Self = Self(0);

    pub fn new(score: u32) -> Self {
        Self(score)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add `delta`, never exceeding `cap`.
    pub fn add_capped(self, delta: u32, cap: u32) -> Self {
        Self(self.0.saturating_add(delta).min(cap))
    }

    /// Apply one newly processed alert of `level`.
    pub fn apply(self, level: ThreatLevel, params: &NetworkParams) -> Self {
        let delta = u32::from(level.get()).saturating_mul(params.risk_per_level);
        self.add_capped(delta, params.max_risk_score)
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
