//! Vote records and quorum arithmetic.

use dagshield_types::{Identity, NetworkParams, ReportId, Timestamp};
use serde::{Deserialize, Serialize};

/// One identity's vote on one report. At most one exists per (report, voter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub report_id: ReportId,
    pub voter: Identity,
    pub agree: bool,
    pub cast_at: Timestamp,
}

/// Agreeing votes a report needs: the chain's threshold, but never less than
/// the network-wide floor.
pub fn effective_quorum(chain_threshold: u32, params: &NetworkParams) -> u32 {
    chain_threshold.max(params.min_quorum_floor)
}

/// Whether `consensus_score` agreeing votes satisfy the quorum.
pub fn quorum_reached(consensus_score: u32, chain_threshold: u32, params: &NetworkParams) -> bool {
    consensus_score >= effective_quorum(chain_threshold, params)
}
