//! The threat node: owns the registries, the consensus engine, one relay per
//! chain and the propagation queue, and wires them together.
//!
//! Every public operation locks only what it needs, commits its state change,
//! then publishes the resulting events on the broadcast stream.

use std::collections::BTreeMap;
use std::sync::Arc;

use dagshield_oracle::{
    ConsensusEngine, MemoryLedger, OracleEvent, PropagationIntent, ReportStatus, SubmitOutcome,
    ThreatReport, VoteOutcome,
};
use dagshield_registry::{
    AdminPolicy, ChainConfig, ChainConfigStore, ChainDirectory, IdentityRegistry,
};
use dagshield_relay::{BlockRecord, ReceiveOutcome, RelayEngine, RiskScore};
use dagshield_types::{
    ChainId, Clock, Identity, NetworkParams, ReportId, ReportSubmission, Signature, TargetAddress,
    Timestamp,
};
use tokio::sync::{broadcast, Mutex};

use crate::config::NodeConfig;
use crate::dispatch::{DispatchQueue, PendingFrame, Retry};
use crate::events::NodeEvent;
use crate::message::{threat_notice, CrossChainMessage, MessageKind};
use crate::metrics::NodeMetrics;
use crate::review::ReviewPolicy;
use crate::NodeError;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Totals for one [`ThreatNode::flush_dispatch`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// First-time deliveries that changed relay state.
    pub delivered: usize,
    /// Redeliveries the relay ignored.
    pub duplicates: usize,
    /// Frames put back for a later pass.
    pub requeued: usize,
    /// Frames given up on.
    pub dropped: usize,
}

enum Delivery {
    Processed,
    Duplicate,
    Retry,
    Rejected,
}

pub struct ThreatNode {
    identity: Identity,
    admin: Arc<dyn AdminPolicy>,
    propagator: Identity,
    params: NetworkParams,
    review: ReviewPolicy,
    clock: Arc<dyn Clock>,

    identities: Arc<IdentityRegistry>,
    chains: Arc<ChainConfigStore>,
    engine: Mutex<ConsensusEngine<MemoryLedger>>,
    relays: Mutex<BTreeMap<ChainId, RelayEngine>>,
    dispatch: Mutex<DispatchQueue>,

    pub metrics: Arc<NodeMetrics>,
    events: broadcast::Sender<NodeEvent>,
}

impl ThreatNode {
    pub fn new(
        config: &NodeConfig,
        identity: Identity,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let admin_identity = config.admin_identity(identity)?;
        let propagator = config.propagator_identity(identity)?;
        let admin = config.admin_policy(identity)?;

        let identities = Arc::new(IdentityRegistry::seeded(
            admin.clone(),
            config.authorized_identities()?,
        ));
        let chains = Arc::new(ChainConfigStore::seeded(
            admin.clone(),
            config.chains.iter().cloned(),
        )?);
        let engine = ConsensusEngine::new(
            identities.clone(),
            chains.clone(),
            MemoryLedger::new(),
            config.params.clone(),
        );
        let relays: BTreeMap<ChainId, RelayEngine> = config
            .chains
            .iter()
            .map(|seed| {
                let relay = RelayEngine::new(
                    seed.chain_id,
                    propagator,
                    admin.clone(),
                    config.params.clone(),
                );
                (seed.chain_id, relay)
            })
            .collect();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        tracing::info!(
            %identity,
            admin = %admin_identity,
            co_admins = config.admins.len(),
            %propagator,
            chains = relays.len(),
            authorized = identities.authorized_count(),
            "threat node initialised"
        );

        Ok(Self {
            identity,
            admin,
            propagator,
            params: config.params.clone(),
            review: ReviewPolicy::new(config.review_confidence, config.review_min_level),
            clock,
            identities,
            chains,
            engine: Mutex::new(engine),
            relays: Mutex::new(relays),
            dispatch: Mutex::new(DispatchQueue::new(
                config.dispatch_batch_size,
                config.dispatch_max_attempts,
            )),
            metrics: Arc::new(NodeMetrics::new()?),
            events,
        })
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.events.subscribe()
    }

    // ── Reports & votes ──────────────────────────────────────────────────

    pub async fn submit_report(
        &self,
        caller: &Identity,
        submission: &ReportSubmission,
        signature: &Signature,
    ) -> Result<SubmitOutcome, NodeError> {
        let now = self.clock.now();
        let (result, events) = {
            let mut engine = self.engine.lock().await;
            let result = engine.submit(caller, submission, signature, now);
            (result, engine.drain_events())
        };
        self.publish_oracle(events);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.metrics.reports_rejected.inc();
                tracing::warn!(%caller, chain = %submission.chain_id, error = %e, "report rejected");
                return Err(e.into());
            }
        };
        self.metrics.reports_submitted.inc();
        if outcome.verified {
            self.metrics.reports_verified.inc();
        }
        self.enqueue_intents(&outcome.intents, now).await?;
        Ok(outcome)
    }

    pub async fn vote(
        &self,
        caller: &Identity,
        report_id: &ReportId,
        agree: bool,
    ) -> Result<VoteOutcome, NodeError> {
        let now = self.clock.now();
        let (result, events) = {
            let mut engine = self.engine.lock().await;
            let result = engine.vote(caller, report_id, agree, now);
            (result, engine.drain_events())
        };
        self.publish_oracle(events);

        let outcome = result.map_err(|e| {
            tracing::warn!(%caller, %report_id, error = %e, "vote rejected");
            e
        })?;
        self.metrics.votes_cast.inc();
        if outcome.newly_verified {
            self.metrics.reports_verified.inc();
        }
        self.enqueue_intents(&outcome.intents, now).await?;
        Ok(outcome)
    }

    /// Reports `voter` may still vote on, with the automatic review verdict.
    pub async fn pending_reviews(&self, voter: &Identity) -> Result<Vec<(ReportId, bool)>, NodeError> {
        let now = self.clock.now();
        let engine = self.engine.lock().await;
        Ok(engine
            .open_reports_for(voter, now)?
            .iter()
            .map(|report| (report.report_id, self.review.agrees(report)))
            .collect())
    }

    /// Vote on every pending report according to the review policy.
    ///
    /// A vote that fails (for instance because the window closed in the
    /// meantime) is logged and skipped.
    pub async fn review_pending(&self, voter: &Identity) -> Result<Vec<(ReportId, VoteOutcome)>, NodeError> {
        let mut cast = Vec::new();
        for (report_id, agree) in self.pending_reviews(voter).await? {
            match self.vote(voter, &report_id, agree).await {
                Ok(outcome) => cast.push((report_id, outcome)),
                Err(e) => tracing::debug!(%report_id, error = %e, "review vote skipped"),
            }
        }
        Ok(cast)
    }

    pub async fn report(&self, report_id: &ReportId) -> Result<Option<ThreatReport>, NodeError> {
        Ok(self.engine.lock().await.report(report_id)?)
    }

    pub async fn report_status(&self, report_id: &ReportId) -> Result<ReportStatus, NodeError> {
        let now = self.clock.now();
        Ok(self.engine.lock().await.status(report_id, now)?)
    }

    pub async fn stale_reports(&self) -> Result<Vec<ThreatReport>, NodeError> {
        let now = self.clock.now();
        Ok(self.engine.lock().await.stale_reports(now)?)
    }

    // ── Administration ───────────────────────────────────────────────────

    pub fn authorize(&self, caller: &Identity, identity: Identity) -> Result<bool, NodeError> {
        Ok(self.identities.authorize(caller, identity)?)
    }

    pub fn revoke(&self, caller: &Identity, identity: &Identity) -> Result<bool, NodeError> {
        Ok(self.identities.revoke(caller, identity)?)
    }

    /// Add or replace a chain's policy. A relay is started for chains the
    /// node has not seen before.
    pub async fn set_chain_config(
        &self,
        caller: &Identity,
        chain: ChainId,
        config: ChainConfig,
    ) -> Result<(), NodeError> {
        self.chains.set_config(caller, chain, config)?;
        let mut relays = self.relays.lock().await;
        if !relays.contains_key(&chain) {
            tracing::info!(%chain, "relay started for new chain");
            relays.insert(
                chain,
                RelayEngine::new(chain, self.propagator, self.admin.clone(), self.params.clone()),
            );
        }
        Ok(())
    }

    pub fn chain_config(&self, chain: ChainId) -> ChainConfig {
        self.chains.config(chain)
    }

    pub async fn manual_block(
        &self,
        caller: &Identity,
        chain: ChainId,
        target: &TargetAddress,
    ) -> Result<bool, NodeError> {
        let now = self.clock.now();
        let mut relays = self.relays.lock().await;
        let relay = relays.get_mut(&chain).ok_or(NodeError::UnknownChain(chain))?;
        let blocked = relay.manual_block(caller, target, now)?;
        if blocked {
            self.metrics.addresses_blocked.inc();
        }
        self.publish_relay(relay);
        self.refresh_blocked_gauge(&relays);
        Ok(blocked)
    }

    pub async fn unblock(
        &self,
        caller: &Identity,
        chain: ChainId,
        target: &TargetAddress,
    ) -> Result<(), NodeError> {
        let mut relays = self.relays.lock().await;
        let relay = relays.get_mut(&chain).ok_or(NodeError::UnknownChain(chain))?;
        relay.unblock(caller, target)?;
        self.publish_relay(relay);
        self.refresh_blocked_gauge(&relays);
        Ok(())
    }

    /// Block `target` on `origin_chain` and queue the block for every other
    /// active chain.
    pub async fn emergency_block(
        &self,
        caller: &Identity,
        origin_chain: ChainId,
        target: &TargetAddress,
    ) -> Result<bool, NodeError> {
        let blocked = self.manual_block(caller, origin_chain, target).await?;
        let now = self.clock.now();

        let mut queue = self.dispatch.lock().await;
        for chain in self.chains.active_chains() {
            if chain == origin_chain {
                continue;
            }
            let msg = CrossChainMessage::emergency_block(origin_chain, chain, target.clone(), now);
            queue.enqueue(chain, msg.encode()?);
        }
        self.metrics.dispatch_queue_depth.set(queue.depth() as i64);
        tracing::warn!(%origin_chain, %target, "emergency block broadcast");
        Ok(blocked)
    }

    // ── Relay queries ────────────────────────────────────────────────────

    pub async fn risk_score(&self, chain: ChainId, target: &TargetAddress) -> Result<RiskScore, NodeError> {
        let relays = self.relays.lock().await;
        let relay = relays.get(&chain).ok_or(NodeError::UnknownChain(chain))?;
        Ok(relay.risk_score(target))
    }

    pub async fn is_blocked(&self, chain: ChainId, target: &TargetAddress) -> Result<bool, NodeError> {
        let relays = self.relays.lock().await;
        let relay = relays.get(&chain).ok_or(NodeError::UnknownChain(chain))?;
        Ok(relay.is_blocked(target))
    }

    pub async fn block_record(
        &self,
        chain: ChainId,
        target: &TargetAddress,
    ) -> Result<Option<BlockRecord>, NodeError> {
        let relays = self.relays.lock().await;
        let relay = relays.get(&chain).ok_or(NodeError::UnknownChain(chain))?;
        Ok(relay.block_record(target).cloned())
    }

    pub async fn blocked_addresses(&self, chain: ChainId) -> Result<Vec<TargetAddress>, NodeError> {
        let relays = self.relays.lock().await;
        let relay = relays.get(&chain).ok_or(NodeError::UnknownChain(chain))?;
        Ok(relay.blocked_addresses())
    }

    pub async fn relay_chains(&self) -> Vec<ChainId> {
        self.relays.lock().await.keys().copied().collect()
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    pub async fn dispatch_depth(&self) -> usize {
        self.dispatch.lock().await.depth()
    }

    /// Queue an intent again, as a transport retry would.
    pub async fn redeliver(&self, intent: &PropagationIntent) -> Result<(), NodeError> {
        self.enqueue_intents(std::slice::from_ref(intent), self.clock.now())
            .await
    }

    /// Deliver one batch per chain to the relays.
    pub async fn flush_dispatch(&self) -> Result<DispatchReport, NodeError> {
        let now = self.clock.now();
        let batches = self.dispatch.lock().await.take_batches();
        let mut report = DispatchReport::default();
        let mut failed: Vec<(ChainId, Vec<PendingFrame>)> = Vec::new();

        {
            let mut relays = self.relays.lock().await;
            for (chain, frames) in batches {
                let mut chain_failed = Vec::new();
                for frame in frames {
                    match self.deliver(&mut relays, chain, &frame.bytes, now) {
                        Delivery::Processed => report.delivered += 1,
                        Delivery::Duplicate => report.duplicates += 1,
                        Delivery::Retry => chain_failed.push(frame),
                        Delivery::Rejected => {
                            report.dropped += 1;
                            self.note_dropped(chain, frame.attempts + 1);
                        }
                    }
                }
                if !chain_failed.is_empty() {
                    failed.push((chain, chain_failed));
                }
            }
            self.refresh_blocked_gauge(&relays);
        }

        let mut queue = self.dispatch.lock().await;
        for (chain, frames) in failed {
            for outcome in queue.retry(chain, frames) {
                match outcome {
                    Retry::Requeued => report.requeued += 1,
                    Retry::Dropped { attempts } => {
                        report.dropped += 1;
                        self.note_dropped(chain, attempts);
                    }
                }
            }
        }
        self.metrics.dispatch_queue_depth.set(queue.depth() as i64);

        if report != DispatchReport::default() {
            tracing::debug!(?report, "dispatch flushed");
        }
        Ok(report)
    }

    fn deliver(
        &self,
        relays: &mut BTreeMap<ChainId, RelayEngine>,
        chain: ChainId,
        bytes: &[u8],
        now: Timestamp,
    ) -> Delivery {
        let msg = match CrossChainMessage::decode(bytes) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(%chain, error = %e, "undecodable cross-chain frame");
                return Delivery::Rejected;
            }
        };
        if msg.target_chain != chain {
            tracing::warn!(%chain, addressed_to = %msg.target_chain, "misrouted cross-chain frame");
            return Delivery::Rejected;
        }
        if !self.chains.config(chain).active {
            tracing::debug!(%chain, "chain paused, will retry");
            return Delivery::Retry;
        }
        let Some(relay) = relays.get_mut(&chain) else {
            tracing::debug!(%chain, "no relay for chain yet, will retry");
            return Delivery::Retry;
        };

        let result = match &msg.kind {
            MessageKind::ThreatAlert(alert) => relay
                .receive(&self.identity, &threat_notice(alert), now)
                .map(|outcome| match outcome {
                    ReceiveOutcome::Processed { blocked, .. } => {
                        if blocked {
                            self.metrics.addresses_blocked.inc();
                        }
                        self.metrics.alerts_delivered.inc();
                        Delivery::Processed
                    }
                    ReceiveOutcome::AlreadyProcessed => {
                        self.metrics.alerts_duplicate.inc();
                        Delivery::Duplicate
                    }
                }),
            MessageKind::EmergencyBlock { target } => relay
                .apply_emergency_block(&self.identity, target, msg.source_chain, now)
                .map(|blocked| {
                    if blocked {
                        self.metrics.addresses_blocked.inc();
                        Delivery::Processed
                    } else {
                        Delivery::Duplicate
                    }
                }),
        };
        self.publish_relay(relay);

        result.unwrap_or_else(|e| {
            tracing::warn!(%chain, error = %e, "relay refused cross-chain message");
            Delivery::Rejected
        })
    }

    async fn enqueue_intents(&self, intents: &[PropagationIntent], now: Timestamp) -> Result<(), NodeError> {
        if intents.is_empty() {
            return Ok(());
        }
        let mut queue = self.dispatch.lock().await;
        for intent in intents {
            let frame = CrossChainMessage::threat_alert(intent, now).encode()?;
            queue.enqueue(intent.target_chain, frame);
            self.metrics.alerts_emitted.inc();
        }
        self.metrics.dispatch_queue_depth.set(queue.depth() as i64);
        Ok(())
    }

    fn note_dropped(&self, chain: ChainId, attempts: u32) {
        self.metrics.deliveries_dropped.inc();
        tracing::warn!(target_chain = %chain, attempts, "cross-chain message dropped");
        let _ = self.events.send(NodeEvent::DeliveryDropped {
            target_chain: chain,
            attempts,
        });
    }

    fn publish_oracle(&self, events: Vec<OracleEvent>) {
        for event in events {
            let _ = self.events.send(NodeEvent::Oracle(event));
        }
    }

    fn publish_relay(&self, relay: &mut RelayEngine) {
        let chain_id = relay.chain_id();
        for event in relay.drain_events() {
            let _ = self.events.send(NodeEvent::Relay { chain_id, event });
        }
    }

    fn refresh_blocked_gauge(&self, relays: &BTreeMap<ChainId, RelayEngine>) {
        let total: usize = relays.values().map(RelayEngine::blocked_count).sum();
        self.metrics.blocked_addresses.set(total as i64);
    }
}
