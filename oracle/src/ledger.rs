//! Append-only report ledger.
//!
//! Backends implement [`ReportLedger`]; the consensus engine depends only on
//! the trait. There is deliberately no way to remove a report or a vote.

use crate::error::LedgerError;
use crate::report::ThreatReport;
use crate::voting::VoteRecord;
use dagshield_types::{Identity, ReportId, Timestamp};
use std::collections::{HashMap, HashSet};

pub trait ReportLedger {
    /// Store a new report. Fails with [`LedgerError::DuplicateKey`] rather
    /// than overwriting an existing entry.
    fn insert(&mut self, report: ThreatReport) -> Result<(), LedgerError>;

    fn get(&self, report_id: &ReportId) -> Result<Option<ThreatReport>, LedgerError>;

    fn contains(&self, report_id: &ReportId) -> Result<bool, LedgerError> {
        self.get(report_id).map(|r| r.is_some())
    }

    /// Record a vote and, if it agrees, bump the report's consensus score.
    /// Returns the updated score.
    fn record_vote(&mut self, vote: VoteRecord) -> Result<u32, LedgerError>;

    fn has_voted(&self, report_id: &ReportId, voter: &Identity) -> Result<bool, LedgerError>;

    fn votes(&self, report_id: &ReportId) -> Result<Vec<VoteRecord>, LedgerError>;

    /// Flip a report to verified. Returns `false` if it already was.
    fn mark_verified(&mut self, report_id: &ReportId, at: Timestamp) -> Result<bool, LedgerError>;

    /// All report ids in insertion order.
    fn report_ids(&self) -> Result<Vec<ReportId>, LedgerError>;

    fn report_count(&self) -> Result<u64, LedgerError> {
        self.report_ids().map(|ids| ids.len() as u64)
    }
}

/// In-memory ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    reports: HashMap<ReportId, ThreatReport>,
    order: Vec<ReportId>,
    votes: HashMap<ReportId, Vec<VoteRecord>>,
    voters: HashSet<(ReportId, Identity)>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportLedger for MemoryLedger {
    fn insert(&mut self, report: ThreatReport) -> Result<(), LedgerError> {
        if self.reports.contains_key(&report.report_id) {
            return Err(LedgerError::DuplicateKey(report.report_id));
        }
        self.order.push(report.report_id);
        self.reports.insert(report.report_id, report);
        Ok(())
    }

    fn get(&self, report_id: &ReportId) -> Result<Option<ThreatReport>, LedgerError> {
        Ok(self.reports.get(report_id).cloned())
    }

    fn contains(&self, report_id: &ReportId) -> Result<bool, LedgerError> {
        Ok(self.reports.contains_key(report_id))
    }

    fn record_vote(&mut self, vote: VoteRecord) -> Result<u32, LedgerError> {
        let report = self
            .reports
            .get_mut(&vote.report_id)
            .ok_or(LedgerError::NotFound(vote.report_id))?;
        if !self.voters.insert((vote.report_id, vote.voter)) {
            return Err(LedgerError::DuplicateVote {
                report_id: vote.report_id,
                voter: vote.voter.to_string(),
            });
        }
        if vote.agree {
            report.consensus_score = report.consensus_score.saturating_add(1);
        }
        let score = report.consensus_score;
        self.votes.entry(vote.report_id).or_default().push(vote);
        Ok(score)
    }

    fn has_voted(&self, report_id: &ReportId, voter: &Identity) -> Result<bool, LedgerError> {
        Ok(self.voters.contains(&(*report_id, *voter)))
    }

    fn votes(&self, report_id: &ReportId) -> Result<Vec<VoteRecord>, LedgerError> {
        Ok(self.votes.get(report_id).cloned().unwrap_or_default())
    }

    fn mark_verified(&mut self, report_id: &ReportId, at: Timestamp) -> Result<bool, LedgerError> {
        let report = self
            .reports
            .get_mut(report_id)
            .ok_or(LedgerError::NotFound(*report_id))?;
        if report.verified {
            return Ok(false);
        }
        report.verified = true;
        report.verified_at = Some(at);
        Ok(true)
    }

    fn report_ids(&self) -> Result<Vec<ReportId>, LedgerError> {
        Ok(self.order.clone())
    }

    fn report_count(&self) -> Result<u64, LedgerError> {
        Ok(self.order.len() as u64)
    }
}
