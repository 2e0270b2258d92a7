use dagshield_types::{ChainId, ReportId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    // ── Authorization ────────────────────────────────────────────────────
    #[error("identity {0} is not authorized")]
    NotAuthorized(String),

    #[error("identity {0} cannot vote on its own report")]
    SelfVote(String),

    // ── Validation ───────────────────────────────────────────────────────
    #[error("threat level {0} is outside 1..=10")]
    InvalidSeverity(u8),

    #[error("confidence {0} is outside 0..=100")]
    InvalidConfidence(u8),

    #[error("chain {0} is not active")]
    ChainInactive(ChainId),

    #[error("confidence {have} is below chain minimum {need}")]
    ConfidenceTooLow { have: u8, need: u8 },

    #[error("signature does not match the submitting identity")]
    BadSignature,

    // ── Ledger state ─────────────────────────────────────────────────────
    #[error("report {0} already exists")]
    DuplicateReport(ReportId),

    #[error("report {0} not found")]
    ReportNotFound(ReportId),

    #[error("voting window for report {report_id} closed at {closed_at}")]
    VotingWindowClosed {
        report_id: ReportId,
        closed_at: Timestamp,
    },

    #[error("identity {0} has already voted on this report")]
    AlreadyVoted(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Failures of a [`crate::ReportLedger`] backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("report {0} already stored")]
    DuplicateKey(ReportId),

    #[error("report {0} not stored")]
    NotFound(ReportId),

    #[error("vote by {voter} on {report_id} already stored")]
    DuplicateVote { report_id: ReportId, voter: String },
}
