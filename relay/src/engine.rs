//! Relay engine for a single receiving chain.

use crate::blocklist::{BlockList, BlockRecord, BlockSource};
use crate::error::RelayError;
use crate::events::RelayEvent;
use crate::risk::RiskScore;
use crate::threat::{CrossChainThreat, ThreatKey, ThreatNotice};
use dagshield_registry::AdminPolicy;
use dagshield_types::{ChainId, Identity, NetworkParams, TargetAddress, ThreatLevel, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;

/// Result of a delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// First delivery of this key.
    Processed {
        risk_score: RiskScore,
        /// True if this delivery put the target on the block list.
        blocked: bool,
    },
    /// The key was seen before; nothing changed.
    AlreadyProcessed,
}

pub struct RelayEngine {
    chain_id: ChainId,
    propagator: Identity,
    admin: Arc<dyn AdminPolicy>,
    params: NetworkParams,
    threats: HashMap<ThreatKey, CrossChainThreat>,
    risk: HashMap<TargetAddress, RiskScore>,
    blocked: BlockList,
    pending_events: Vec<RelayEvent>,
}

impl RelayEngine {
    pub fn new(
        chain_id: ChainId,
        propagator: Identity,
        admin: Arc<dyn AdminPolicy>,
        params: NetworkParams,
    ) -> Self {
        Self {
            chain_id,
            propagator,
            admin,
            params,
            threats: HashMap::new(),
            risk: HashMap::new(),
            blocked: BlockList::new(),
            pending_events: Vec::new(),
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Process a verified alert delivered by the propagation source.
    ///
    /// Redelivery of a processed key is accepted and has no effect.
    pub fn receive(
        &mut self,
        caller: &Identity,
        notice: &ThreatNotice,
        received_at: Timestamp,
    ) -> Result<ReceiveOutcome, RelayError> {
        self.require_propagator(caller)?;
        let threat_level = ThreatLevel::new(notice.threat_level)
            .map_err(|_| RelayError::InvalidSeverity(notice.threat_level))?;

        let key = notice.key();
        if self.threats.get(&key).is_some_and(|t| t.processed) {
            tracing::debug!(
                chain = %self.chain_id,
                report_id = %notice.report_id,
                source_chain = %notice.source_chain,
                "duplicate cross-chain delivery ignored"
            );
            return Ok(ReceiveOutcome::AlreadyProcessed);
        }

        self.threats.insert(
            key.clone(),
            CrossChainThreat {
                key,
                threat_level,
                threat_type: notice.threat_type,
                received_at,
                processed: false,
            },
        );
        self.pending_events.push(RelayEvent::CrossChainThreatReceived {
            report_id: notice.report_id,
            source_chain: notice.source_chain,
            target: notice.target.clone(),
        });

        let risk_score = self.raise_risk(&notice.target, threat_level);

        let blocked = self.params.triggers_auto_block(threat_level)
            && self.block(
                notice.target.clone(),
                BlockRecord {
                    threat_level,
                    source: BlockSource::Auto,
                    blocked_at: received_at,
                },
            );

        if let Some(threat) = self.threats.get_mut(&notice.key()) {
            threat.processed = true;
        }
        tracing::info!(
            chain = %self.chain_id,
            report_id = %notice.report_id,
            target = %notice.target,
            level = threat_level.get(),
            %risk_score,
            blocked,
            "cross-chain threat processed"
        );
        Ok(ReceiveOutcome::Processed {
            risk_score,
            blocked,
        })
    }

    /// Quarantine `target` by administrator decision.
    ///
    /// Returns `false` if the address was already blocked.
    pub fn manual_block(
        &mut self,
        caller: &Identity,
        target: &TargetAddress,
        at: Timestamp,
    ) -> Result<bool, RelayError> {
        self.require_admin(caller)?;
        Ok(self.block(
            target.clone(),
            BlockRecord {
                threat_level: ThreatLevel::MAX,
                source: BlockSource::Manual,
                blocked_at: at,
            },
        ))
    }

    /// Mirror an emergency block raised on `origin_chain`.
    pub fn apply_emergency_block(
        &mut self,
        caller: &Identity,
        target: &TargetAddress,
        origin_chain: ChainId,
        at: Timestamp,
    ) -> Result<bool, RelayError> {
        self.require_propagator(caller)?;
        Ok(self.block(
            target.clone(),
            BlockRecord {
                threat_level: ThreatLevel::MAX,
                source: BlockSource::Emergency { origin_chain },
                blocked_at: at,
            },
        ))
    }

    /// Lift a block and reset the address's risk to zero.
    pub fn unblock(&mut self, caller: &Identity, target: &TargetAddress) -> Result<(), RelayError> {
        self.require_admin(caller)?;
        if self.blocked.unblock(target).is_none() {
            return Err(RelayError::NotBlocked(target.clone()));
        }
        let previous = self.risk.remove(target).unwrap_or_default();

        tracing::info!(chain = %self.chain_id, %target, %previous, "address unblocked");
        self.pending_events.push(RelayEvent::AddressUnblocked {
            target: target.clone(),
        });
        if !previous.is_zero() {
            self.pending_events.push(RelayEvent::RiskScoreUpdated {
                target: target.clone(),
                risk_score: RiskScore::ZERO,
            });
        }
        Ok(())
    }

    fn raise_risk(&mut self, target: &TargetAddress, level: ThreatLevel) -> RiskScore {
        let entry = self.risk.entry(target.clone()).or_default();
        let updated = entry.apply(level, &self.params);
        let changed = updated != *entry;
        *entry = updated;
        if changed {
            self.pending_events.push(RelayEvent::RiskScoreUpdated {
                target: target.clone(),
                risk_score: updated,
            });
        }
        updated
    }

    fn block(&mut self, target: TargetAddress, record: BlockRecord) -> bool {
        let threat_level = record.threat_level;
        let source = record.source;
        if !self.blocked.block(target.clone(), record) {
            tracing::debug!(chain = %self.chain_id, %target, "address already blocked");
            return false;
        }
        tracing::warn!(chain = %self.chain_id, %target, level = threat_level.get(), ?source, "address blocked");
        self.pending_events.push(RelayEvent::AddressBlocked {
            target,
            threat_level,
            source,
        });
        true
    }

    fn require_propagator(&self, caller: &Identity) -> Result<(), RelayError> {
        if *caller != self.propagator {
            return Err(RelayError::UnauthorizedSource(caller.to_string()));
        }
        Ok(())
    }

    fn require_admin(&self, caller: &Identity) -> Result<(), RelayError> {
        if !self.admin.is_admin(caller) {
            return Err(RelayError::NotAdmin(caller.to_string()));
        }
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn risk_score(&self, target: &TargetAddress) -> RiskScore {
        self.risk.get(target).copied().unwrap_or_default()
    }

    pub fn is_blocked(&self, target: &TargetAddress) -> bool {
        self.blocked.contains(target)
    }

    pub fn block_record(&self, target: &TargetAddress) -> Option<&BlockRecord> {
        self.blocked.get(target)
    }

    pub fn threat(&self, key: &ThreatKey) -> Option<&CrossChainThreat> {
        self.threats.get(key)
    }

    pub fn blocked_addresses(&self) -> Vec<TargetAddress> {
        self.blocked.addresses()
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    pub fn processed_count(&self) -> usize {
        self.threats.len()
    }

    /// Take all events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<RelayEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
