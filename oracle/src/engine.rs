//! Consensus engine: connects authorization, chain policy, the ledger and
//! quorum evaluation into the submit/vote workflow.

use crate::error::{LedgerError, OracleError};
use crate::events::OracleEvent;
use crate::ledger::ReportLedger;
use crate::propagation::{CrossChainAlert, PropagationIntent};
use crate::report::{ReportStatus, ThreatReport};
use crate::voting::{quorum_reached, VoteRecord};
use dagshield_crypto::{derive_report_id, verify_report};
use dagshield_registry::{Authorizer, ChainDirectory};
use dagshield_types::{
    validate_confidence, Identity, NetworkParams, ReportId, ReportSubmission, Signature,
    TargetAddress, ThreatLevel, Timestamp,
};
use std::sync::Arc;

/// Result of an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub report_id: ReportId,
    /// True only if the submission alone satisfied quorum.
    pub verified: bool,
    pub intents: Vec<PropagationIntent>,
}

/// Result of an accepted vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteOutcome {
    pub consensus_score: u32,
    pub verified: bool,
    /// True if this vote performed the false → true transition.
    pub newly_verified: bool,
    /// Non-empty only on the transition of a high-severity report.
    pub intents: Vec<PropagationIntent>,
}

/// Owns the report and vote lifecycle.
///
/// Every call runs to completion; the caller serializes access (`&mut self`).
/// Registries are read through narrow traits and never mutated here.
pub struct ConsensusEngine<L: ReportLedger> {
    authorizer: Arc<dyn Authorizer>,
    chains: Arc<dyn ChainDirectory>,
    ledger: L,
    params: NetworkParams,
    pending_events: Vec<OracleEvent>,
}

impl<L: ReportLedger> ConsensusEngine<L> {
    /// `params` are assumed to have passed [`NetworkParams::validate`].
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        chains: Arc<dyn ChainDirectory>,
        ledger: L,
        params: NetworkParams,
    ) -> Self {
        Self {
            authorizer,
            chains,
            ledger,
            params,
            pending_events: Vec::new(),
        }
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Submit a signed observation as `caller`.
    ///
    /// Rejections leave the ledger untouched.
    pub fn submit(
        &mut self,
        caller: &Identity,
        submission: &ReportSubmission,
        signature: &Signature,
        now: Timestamp,
    ) -> Result<SubmitOutcome, OracleError> {
        if !self.authorizer.is_authorized(caller) {
            return Err(OracleError::NotAuthorized(caller.to_string()));
        }
        let threat_level = ThreatLevel::new(submission.threat_level)
            .map_err(|_| OracleError::InvalidSeverity(submission.threat_level))?;
        validate_confidence(submission.confidence)
            .map_err(|_| OracleError::InvalidConfidence(submission.confidence))?;

        let config = self.chains.config(submission.chain_id);
        if !config.active {
            return Err(OracleError::ChainInactive(submission.chain_id));
        }
        if submission.confidence < config.min_confidence {
            return Err(OracleError::ConfidenceTooLow {
                have: submission.confidence,
                need: config.min_confidence,
            });
        }
        if !verify_report(submission, signature, &caller.public_key()) {
            return Err(OracleError::BadSignature);
        }

        let report_id = derive_report_id(submission, now);
        if self.ledger.contains(&report_id)? {
            return Err(OracleError::DuplicateReport(report_id));
        }

        let report = ThreatReport {
            report_id,
            source_chain: submission.chain_id,
            target: submission.target.clone(),
            threat_level,
            threat_type: submission.threat_type,
            evidence_hash: submission.evidence_hash,
            confidence: submission.confidence,
            reporter: *caller,
            submitted_at: now,
            consensus_score: 1,
            verified: false,
            verified_at: None,
        };
        self.ledger.insert(report).map_err(|e| match e {
            LedgerError::DuplicateKey(id) => OracleError::DuplicateReport(id),
            other => OracleError::Ledger(other),
        })?;

        tracing::info!(
            %report_id,
            chain = %submission.chain_id,
            target = %submission.target,
            level = threat_level.get(),
            reporter = %caller,
            "threat report submitted"
        );
        self.pending_events.push(OracleEvent::ReportSubmitted {
            report_id,
            chain_id: submission.chain_id,
            target: submission.target.clone(),
            threat_level,
        });

        let transition = self.evaluate_quorum(&report_id, now)?;
        Ok(SubmitOutcome {
            report_id,
            verified: transition.is_some(),
            intents: transition.unwrap_or_default(),
        })
    }

    /// Record `caller`'s vote on a report inside its voting window.
    pub fn vote(
        &mut self,
        caller: &Identity,
        report_id: &ReportId,
        agree: bool,
        now: Timestamp,
    ) -> Result<VoteOutcome, OracleError> {
        let report = self
            .ledger
            .get(report_id)?
            .ok_or(OracleError::ReportNotFound(*report_id))?;

        let window = self.params.consensus_window_secs;
        if report.submitted_at.window_closed(window, now) {
            return Err(OracleError::VotingWindowClosed {
                report_id: *report_id,
                closed_at: report.voting_deadline(window),
            });
        }
        if !self.authorizer.is_authorized(caller) {
            return Err(OracleError::NotAuthorized(caller.to_string()));
        }
        if self.ledger.has_voted(report_id, caller)? {
            return Err(OracleError::AlreadyVoted(caller.to_string()));
        }
        if report.reporter == *caller {
            return Err(OracleError::SelfVote(caller.to_string()));
        }

        let consensus_score = self
            .ledger
            .record_vote(VoteRecord {
                report_id: *report_id,
                voter: *caller,
                agree,
                cast_at: now,
            })
            .map_err(|e| match e {
                LedgerError::DuplicateVote { voter, .. } => OracleError::AlreadyVoted(voter),
                other => OracleError::Ledger(other),
            })?;

        tracing::debug!(%report_id, voter = %caller, agree, consensus_score, "vote recorded");
        self.pending_events.push(OracleEvent::VoteCast {
            report_id: *report_id,
            voter: *caller,
            agree,
            consensus_score,
        });

        let transition = self.evaluate_quorum(report_id, now)?;
        Ok(VoteOutcome {
            consensus_score,
            verified: report.verified || transition.is_some(),
            newly_verified: transition.is_some(),
            intents: transition.unwrap_or_default(),
        })
    }

    /// Flip the report to verified if it has reached quorum.
    ///
    /// Returns `Some(intents)` only on the false → true transition; the list is
    /// empty for reports below the high-severity cutoff. Already-verified
    /// reports are a no-op.
    fn evaluate_quorum(
        &mut self,
        report_id: &ReportId,
        now: Timestamp,
    ) -> Result<Option<Vec<PropagationIntent>>, OracleError> {
        let report = self
            .ledger
            .get(report_id)?
            .ok_or(OracleError::ReportNotFound(*report_id))?;
        if report.verified {
            tracing::debug!(%report_id, "report already verified, quorum check skipped");
            return Ok(None);
        }

        let config = self.chains.config(report.source_chain);
        if !quorum_reached(report.consensus_score, config.consensus_threshold, &self.params) {
            return Ok(None);
        }
        if !self.ledger.mark_verified(report_id, now)? {
            return Ok(None);
        }

        tracing::info!(
            %report_id,
            consensus_score = report.consensus_score,
            "threat report verified"
        );
        self.pending_events.push(OracleEvent::ReportVerified {
            report_id: *report_id,
            consensus_score: report.consensus_score,
        });

        if !self.params.is_high_severity(report.threat_level) {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(self.fan_out(&report, now)))
    }

    /// One intent per active chain other than the report's source chain.
    fn fan_out(&mut self, report: &ThreatReport, verified_at: Timestamp) -> Vec<PropagationIntent> {
        let alert = CrossChainAlert {
            source_chain: report.source_chain,
            report_id: report.report_id,
            target: report.target.clone(),
            threat_level: report.threat_level,
            threat_type: report.threat_type,
            verified_at,
        };

        let intents: Vec<PropagationIntent> = self
            .chains
            .active_chains()
            .into_iter()
            .filter(|chain| *chain != report.source_chain)
            .map(|target_chain| PropagationIntent {
                target_chain,
                alert: alert.clone(),
            })
            .collect();

        for intent in &intents {
            tracing::info!(
                report_id = %report.report_id,
                target_chain = %intent.target_chain,
                "cross-chain alert emitted"
            );
            self.pending_events.push(OracleEvent::CrossChainAlertEmitted {
                target_chain: intent.target_chain,
                report_id: report.report_id,
                threat_level: report.threat_level,
            });
        }
        intents
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn report(&self, report_id: &ReportId) -> Result<Option<ThreatReport>, OracleError> {
        Ok(self.ledger.get(report_id)?)
    }

    pub fn votes(&self, report_id: &ReportId) -> Result<Vec<VoteRecord>, OracleError> {
        Ok(self.ledger.votes(report_id)?)
    }

    pub fn has_voted(&self, report_id: &ReportId, voter: &Identity) -> Result<bool, OracleError> {
        Ok(self.ledger.has_voted(report_id, voter)?)
    }

    pub fn status(&self, report_id: &ReportId, now: Timestamp) -> Result<ReportStatus, OracleError> {
        let report = self
            .ledger
            .get(report_id)?
            .ok_or(OracleError::ReportNotFound(*report_id))?;
        Ok(report.status(now, self.params.consensus_window_secs))
    }

    /// Every report about `target`, in submission order.
    pub fn reports_for_target(&self, target: &TargetAddress) -> Result<Vec<ThreatReport>, OracleError> {
        self.collect_reports(|r| r.target == *target)
    }

    /// Reports whose window closed without reaching quorum.
    pub fn stale_reports(&self, now: Timestamp) -> Result<Vec<ThreatReport>, OracleError> {
        let window = self.params.consensus_window_secs;
        self.collect_reports(|r| r.status(now, window) == ReportStatus::Expired)
    }

    /// Reports `voter` may still vote on: pending, not its own, not yet voted.
    pub fn open_reports_for(
        &self,
        voter: &Identity,
        now: Timestamp,
    ) -> Result<Vec<ThreatReport>, OracleError> {
        let window = self.params.consensus_window_secs;
        let candidates = self.collect_reports(|r| {
            r.reporter != *voter && r.status(now, window) == ReportStatus::Pending
        })?;
        let mut open = Vec::with_capacity(candidates.len());
        for report in candidates {
            if !self.ledger.has_voted(&report.report_id, voter)? {
                open.push(report);
            }
        }
        Ok(open)
    }

    fn collect_reports(
        &self,
        keep: impl Fn(&ThreatReport) -> bool,
    ) -> Result<Vec<ThreatReport>, OracleError> {
        let mut out = Vec::new();
        for id in self.ledger.report_ids()? {
            if let Some(report) = self.ledger.get(&id)? {
                if keep(&report) {
                    out.push(report);
                }
            }
        }
        Ok(out)
    }

    /// Take all events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use dagshield_nullables::{test_identity, test_keypair, NullClock};
    use dagshield_registry::{
        ChainConfig, ChainConfigStore, ChainSeed, IdentityRegistry, SingleAdmin,
    };
    use dagshield_types::{ChainId, EvidenceHash, KeyPair, ThreatType};

    const ADMIN: u8 = 0;
    const A: u8 = 1;
    const B: u8 = 2;
    const C: u8 = 3;
    const D: u8 = 4;
    const E: u8 = 5;

    struct Harness {
        engine: ConsensusEngine<MemoryLedger>,
        identities: Arc<IdentityRegistry>,
        chains: Arc<ChainConfigStore>,
        clock: NullClock,
    }

    fn chain_config(min_confidence: u8, consensus_threshold: u32) -> ChainConfig {
        ChainConfig {
            active: true,
            min_confidence,
            consensus_threshold,
            relay_endpoint: None,
        }
    }

    fn harness_with(params: NetworkParams) -> Harness {
        let admin = test_identity(ADMIN);
        let policy = Arc::new(SingleAdmin::new(admin));
        let identities = Arc::new(IdentityRegistry::new(policy.clone()));
        for seed in [A, B, C, D, E] {
            identities.authorize(&admin, test_identity(seed)).unwrap();
        }
        let seeds = [1u64, 137, 56, 42161, 10].into_iter().map(|id| ChainSeed {
            chain_id: ChainId::new(id),
            config: chain_config(75, 3),
        });
        let chains = Arc::new(ChainConfigStore::seeded(policy, seeds).unwrap());
        let engine = ConsensusEngine::new(
            identities.clone(),
            chains.clone(),
            MemoryLedger::new(),
            params,
        );
        Harness {
            engine,
            identities,
            chains,
            clock: NullClock::new(1_000),
        }
    }

    fn harness() -> Harness {
        harness_with(NetworkParams::default())
    }

    fn submission(level: u8, confidence: u8) -> ReportSubmission {
        ReportSubmission {
            chain_id: ChainId::new(1),
            target: TargetAddress::parse("0x00000000000000000000000000000000000000bd").unwrap(),
            threat_level: level,
            threat_type: ThreatType::Phishing,
            evidence_hash: EvidenceHash::new([0xEE; 32]),
            confidence,
        }
    }

    fn submit_as(
        h: &mut Harness,
        kp: &KeyPair,
        sub: &ReportSubmission,
    ) -> Result<SubmitOutcome, OracleError> {
        let sig = dagshield_crypto::sign_report(sub, &kp.private);
        let now = h.clock.now();
        h.engine.submit(&kp.identity(), sub, &sig, now)
    }

    fn vote_as(h: &mut Harness, seed: u8, id: &ReportId, agree: bool) -> Result<VoteOutcome, OracleError> {
        let now = h.clock.now();
        h.engine.vote(&test_identity(seed), id, agree, now)
    }

    // ── Submission ───────────────────────────────────────────────────────

    #[test]
    fn submission_creates_unverified_report() {
        let mut h = harness();
        let outcome = submit_as(&mut h, &test_keypair(A), &submission(9, 95)).unwrap();
        assert!(!outcome.verified);
        assert!(outcome.intents.is_empty());

        let report = h.engine.report(&outcome.report_id).unwrap().unwrap();
        assert!(!report.verified);
        assert_eq!(report.consensus_score, 1);
        assert_eq!(report.reporter, test_identity(A));
        assert_eq!(report.submitted_at, Timestamp::new(1_000));

        let events = h.engine.drain_events();
        assert_eq!(
            events,
            vec![OracleEvent::ReportSubmitted {
                report_id: outcome.report_id,
                chain_id: ChainId::new(1),
                target: report.target.clone(),
                threat_level: ThreatLevel::new(9).unwrap(),
            }]
        );
    }

    #[test]
    fn unauthorized_submitter_rejected() {
        let mut h = harness();
        let err = submit_as(&mut h, &test_keypair(42), &submission(9, 95)).unwrap_err();
        assert!(matches!(err, OracleError::NotAuthorized(_)));
        assert_eq!(h.engine.ledger().report_count().unwrap(), 0);
    }

    #[test]
    fn severity_out_of_range_rejected() {
        let mut h = harness();
        for level in [0u8, 11] {
            let err = submit_as(&mut h, &test_keypair(A), &submission(level, 95)).unwrap_err();
            assert_eq!(err, OracleError::InvalidSeverity(level));
        }
    }

    #[test]
    fn confidence_above_hundred_rejected() {
        let mut h = harness();
        let err = submit_as(&mut h, &test_keypair(A), &submission(9, 101)).unwrap_err();
        assert_eq!(err, OracleError::InvalidConfidence(101));
    }

    #[test]
    fn inactive_and_unknown_chains_rejected() {
        let mut h = harness();
        let mut sub = submission(9, 95);
        sub.chain_id = ChainId::new(999);
        let err = submit_as(&mut h, &test_keypair(A), &sub).unwrap_err();
        assert_eq!(err, OracleError::ChainInactive(ChainId::new(999)));

        let mut off = chain_config(75, 3);
        off.active = false;
        h.chains
            .set_config(&test_identity(ADMIN), ChainId::new(1), off)
            .unwrap();
        let err = submit_as(&mut h, &test_keypair(A), &submission(9, 95)).unwrap_err();
        assert_eq!(err, OracleError::ChainInactive(ChainId::new(1)));
    }

    #[test]
    fn low_confidence_rejected_without_report() {
        let mut h = harness();
        let err = submit_as(&mut h, &test_keypair(D), &submission(9, 60)).unwrap_err();
        assert_eq!(err, OracleError::ConfidenceTooLow { have: 60, need: 75 });
        assert_eq!(h.engine.ledger().report_count().unwrap(), 0);
        assert!(h.engine.drain_events().is_empty());
    }

    #[test]
    fn signature_by_other_key_rejected() {
        let mut h = harness();
        let sub = submission(9, 95);
        let forged = dagshield_crypto::sign_report(&sub, &test_keypair(B).private);
        let now = h.clock.now();
        let err = h
            .engine
            .submit(&test_identity(A), &sub, &forged, now)
            .unwrap_err();
        assert_eq!(err, OracleError::BadSignature);
    }

    #[test]
    fn signature_over_different_fields_rejected() {
        let mut h = harness();
        let signed = submission(3, 95);
        let sig = dagshield_crypto::sign_report(&signed, &test_keypair(A).private);
        let now = h.clock.now();
        let err = h
            .engine
            .submit(&test_identity(A), &submission(9, 95), &sig, now)
            .unwrap_err();
        assert_eq!(err, OracleError::BadSignature);
    }

    #[test]
    fn identical_tuple_at_same_time_is_duplicate() {
        let mut h = harness();
        let first = submit_as(&mut h, &test_keypair(A), &submission(9, 95)).unwrap();

        // A different reporter racing with the same observation loses.
        let err = submit_as(&mut h, &test_keypair(B), &submission(9, 95)).unwrap_err();
        assert_eq!(err, OracleError::DuplicateReport(first.report_id));

        let stored = h.engine.report(&first.report_id).unwrap().unwrap();
        assert_eq!(stored.reporter, test_identity(A));
        assert_eq!(h.engine.ledger().report_count().unwrap(), 1);
    }

    #[test]
    fn same_tuple_later_gets_new_id() {
        let mut h = harness();
        let first = submit_as(&mut h, &test_keypair(A), &submission(9, 95)).unwrap();
        h.clock.advance(1);
        let second = submit_as(&mut h, &test_keypair(A), &submission(9, 95)).unwrap();
        assert_ne!(first.report_id, second.report_id);
    }

    #[test]
    fn submission_can_verify_immediately_when_quorum_is_one() {
        let params = NetworkParams {
            min_quorum_floor: 1,
            ..NetworkParams::default()
        };
        let mut h = harness_with(params);
        h.chains
            .set_config(&test_identity(ADMIN), ChainId::new(1), chain_config(75, 1))
            .unwrap();

        let outcome = submit_as(&mut h, &test_keypair(A), &submission(9, 95)).unwrap();
        assert!(outcome.verified);
        assert_eq!(outcome.intents.len(), 4);
    }

    // ── Voting ───────────────────────────────────────────────────────────

    #[test]
    fn end_to_end_quorum_and_fan_out() {
        let mut h = harness();
        let outcome = submit_as(&mut h, &test_keypair(A), &submission(9, 95)).unwrap();
        let id = outcome.report_id;
        h.engine.drain_events();

        h.clock.advance(30);
        let first = vote_as(&mut h, B, &id, true).unwrap();
        assert_eq!(first.consensus_score, 2);
        assert!(!first.verified);

        h.clock.advance(30);
        let second = vote_as(&mut h, C, &id, true).unwrap();
        assert_eq!(second.consensus_score, 3);
        assert!(second.verified);
        assert!(second.newly_verified);

        let targets: Vec<u64> = second
            .intents
            .iter()
            .map(|i| i.target_chain.as_u64())
            .collect();
        assert_eq!(targets, vec![10, 56, 137, 42161]);
        assert!(second.intents.iter().all(|i| i.alert.report_id == id
            && i.alert.source_chain == ChainId::new(1)
            && i.alert.verified_at == Timestamp::new(1_060)));

        let report = h.engine.report(&id).unwrap().unwrap();
        assert!(report.verified);
        assert_eq!(report.verified_at, Some(Timestamp::new(1_060)));

        let events = h.engine.drain_events();
        let emitted = events
            .iter()
            .filter(|e| matches!(e, OracleEvent::CrossChainAlertEmitted { .. }))
            .count();
        assert_eq!(emitted, 4);
        assert!(events.contains(&OracleEvent::ReportVerified {
            report_id: id,
            consensus_score: 3,
        }));
    }

    #[test]
    fn votes_after_verification_do_not_re_propagate() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, true).unwrap();
        vote_as(&mut h, C, &id, true).unwrap();
        h.engine.drain_events();

        let late = vote_as(&mut h, D, &id, true).unwrap();
        assert!(late.verified);
        assert!(!late.newly_verified);
        assert!(late.intents.is_empty());
        assert_eq!(late.consensus_score, 4);

        let events = h.engine.drain_events();
        assert!(events.iter().all(|e| matches!(e, OracleEvent::VoteCast { .. })));
    }

    #[test]
    fn disagreeing_votes_do_not_count() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, false).unwrap();
        let outcome = vote_as(&mut h, C, &id, false).unwrap();
        assert_eq!(outcome.consensus_score, 1);
        assert!(!outcome.verified);
        assert_eq!(h.engine.votes(&id).unwrap().len(), 2);
    }

    #[test]
    fn low_severity_verifies_without_propagation() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(6, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, true).unwrap();
        let outcome = vote_as(&mut h, C, &id, true).unwrap();
        assert!(outcome.newly_verified);
        assert!(outcome.intents.is_empty());
    }

    #[test]
    fn propagation_skips_inactive_chains() {
        let mut h = harness();
        let mut off = chain_config(75, 3);
        off.active = false;
        h.chains
            .set_config(&test_identity(ADMIN), ChainId::new(56), off)
            .unwrap();

        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, true).unwrap();
        let outcome = vote_as(&mut h, C, &id, true).unwrap();
        let targets: Vec<u64> = outcome
            .intents
            .iter()
            .map(|i| i.target_chain.as_u64())
            .collect();
        assert_eq!(targets, vec![10, 137, 42161]);
    }

    #[test]
    fn vote_after_window_rejected_and_count_unchanged() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, true).unwrap();

        h.clock.advance(301);
        let err = vote_as(&mut h, E, &id, true).unwrap_err();
        assert_eq!(
            err,
            OracleError::VotingWindowClosed {
                report_id: id,
                closed_at: Timestamp::new(1_300),
            }
        );
        let report = h.engine.report(&id).unwrap().unwrap();
        assert_eq!(report.consensus_score, 2);
        assert!(!h.engine.has_voted(&id, &test_identity(E)).unwrap());
    }

    #[test]
    fn vote_at_window_boundary_accepted() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        h.clock.advance(300);
        assert!(vote_as(&mut h, B, &id, true).is_ok());
    }

    #[test]
    fn window_closes_even_for_already_verified_reports() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, true).unwrap();
        vote_as(&mut h, C, &id, true).unwrap();
        h.clock.advance(400);
        assert!(matches!(
            vote_as(&mut h, D, &id, true),
            Err(OracleError::VotingWindowClosed { .. })
        ));
    }

    #[test]
    fn vote_on_unknown_report_rejected() {
        let mut h = harness();
        let err = vote_as(&mut h, B, &ReportId::new([9u8; 32]), true).unwrap_err();
        assert_eq!(err, OracleError::ReportNotFound(ReportId::new([9u8; 32])));
    }

    #[test]
    fn double_vote_rejected() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, false).unwrap();
        let err = vote_as(&mut h, B, &id, true).unwrap_err();
        assert!(matches!(err, OracleError::AlreadyVoted(_)));
        assert_eq!(h.engine.report(&id).unwrap().unwrap().consensus_score, 1);
    }

    #[test]
    fn reporter_cannot_vote_on_own_report() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        let err = vote_as(&mut h, A, &id, true).unwrap_err();
        assert!(matches!(err, OracleError::SelfVote(_)));
    }

    #[test]
    fn unauthorized_voter_rejected() {
        let mut h = harness();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        let err = vote_as(&mut h, 77, &id, true).unwrap_err();
        assert!(matches!(err, OracleError::NotAuthorized(_)));
    }

    #[test]
    fn revocation_blocks_new_votes_but_keeps_verified_reports() {
        let mut h = harness();
        let admin = test_identity(ADMIN);
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        vote_as(&mut h, B, &id, true).unwrap();
        vote_as(&mut h, C, &id, true).unwrap();

        h.identities.revoke(&admin, &test_identity(A)).unwrap();
        h.identities.revoke(&admin, &test_identity(D)).unwrap();
        assert!(h.engine.report(&id).unwrap().unwrap().verified);
        assert!(matches!(
            vote_as(&mut h, D, &id, true),
            Err(OracleError::NotAuthorized(_))
        ));
    }

    #[test]
    fn floor_protects_against_colluding_pair() {
        let mut h = harness();
        h.chains
            .set_config(&test_identity(ADMIN), ChainId::new(1), chain_config(75, 1))
            .unwrap();
        let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        let outcome = vote_as(&mut h, B, &id, true).unwrap();
        assert!(!outcome.verified);
        let outcome = vote_as(&mut h, C, &id, true).unwrap();
        assert!(outcome.verified);
    }

    #[test]
    fn vote_order_does_not_change_outcome() {
        let orders: [[u8; 4]; 3] = [[B, C, D, E], [E, D, C, B], [C, E, B, D]];
        let mut verified_reports = Vec::new();
        for order in orders {
            let mut h = harness();
            h.chains
                .set_config(&test_identity(ADMIN), ChainId::new(1), chain_config(75, 4))
                .unwrap();
            let id = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
                .unwrap()
                .report_id;
            let agree = |seed: u8| seed != D;
            for seed in order {
                vote_as(&mut h, seed, &id, agree(seed)).unwrap();
            }
            let report = h.engine.report(&id).unwrap().unwrap();
            verified_reports.push((report.verified, report.consensus_score));
        }
        assert!(verified_reports.iter().all(|r| *r == (true, 4)));
    }

    // ── Queries ──────────────────────────────────────────────────────────

    #[test]
    fn expired_reports_are_queryable_as_stale() {
        let mut h = harness();
        let stale = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        h.clock.advance(200);
        let mut fresh_sub = submission(9, 95);
        fresh_sub.evidence_hash = EvidenceHash::new([0x11; 32]);
        let fresh = submit_as(&mut h, &test_keypair(B), &fresh_sub)
            .unwrap()
            .report_id;

        h.clock.advance(150);
        let now = h.clock.now();
        assert_eq!(h.engine.status(&stale, now).unwrap(), ReportStatus::Expired);
        assert_eq!(h.engine.status(&fresh, now).unwrap(), ReportStatus::Pending);

        let stale_ids: Vec<ReportId> = h
            .engine
            .stale_reports(now)
            .unwrap()
            .into_iter()
            .map(|r| r.report_id)
            .collect();
        assert_eq!(stale_ids, vec![stale]);
    }

    #[test]
    fn reports_for_target_in_submission_order() {
        let mut h = harness();
        let first = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        h.clock.advance(5);
        let second = submit_as(&mut h, &test_keypair(B), &submission(4, 80))
            .unwrap()
            .report_id;

        let mut other = submission(9, 95);
        other.target = TargetAddress::parse("0x00000000000000000000000000000000000000cc").unwrap();
        submit_as(&mut h, &test_keypair(C), &other).unwrap();

        let ids: Vec<ReportId> = h
            .engine
            .reports_for_target(&submission(9, 95).target)
            .unwrap()
            .into_iter()
            .map(|r| r.report_id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn open_reports_excludes_own_voted_and_closed() {
        let mut h = harness();
        let by_a = submit_as(&mut h, &test_keypair(A), &submission(9, 95))
            .unwrap()
            .report_id;
        let mut sub_b = submission(9, 95);
        sub_b.evidence_hash = EvidenceHash::new([0x22; 32]);
        let by_b = submit_as(&mut h, &test_keypair(B), &sub_b).unwrap().report_id;

        let now = h.clock.now();
        let open: Vec<ReportId> = h
            .engine
            .open_reports_for(&test_identity(B), now)
            .unwrap()
            .into_iter()
            .map(|r| r.report_id)
            .collect();
        assert_eq!(open, vec![by_a]);

        vote_as(&mut h, C, &by_a, true).unwrap();
        let open: Vec<ReportId> = h
            .engine
            .open_reports_for(&test_identity(C), now)
            .unwrap()
            .into_iter()
            .map(|r| r.report_id)
            .collect();
        assert_eq!(open, vec![by_b]);

        h.clock.advance(301);
        assert!(h
            .engine
            .open_reports_for(&test_identity(D), h.clock.now())
            .unwrap()
            .is_empty());
    }
}
