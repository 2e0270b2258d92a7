//! Prometheus metrics for the DAGShield node.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`]; [`NodeMetrics::encode_text`]
//! renders it in the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

use crate::NodeError;

pub struct NodeMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Reports accepted into the ledger.
    pub reports_submitted: IntCounter,
    /// Submissions rejected for any reason.
    pub reports_rejected: IntCounter,
    /// Reports that reached quorum.
    pub reports_verified: IntCounter,
    /// Votes accepted.
    pub votes_cast: IntCounter,
    /// Propagation intents produced by the consensus engine.
    pub alerts_emitted: IntCounter,
    /// Alerts processed by a relay for the first time.
    pub alerts_delivered: IntCounter,
    /// Redeliveries absorbed by relay idempotency.
    pub alerts_duplicate: IntCounter,
    /// Messages dropped after exhausting their delivery attempts or failing to decode.
    pub deliveries_dropped: IntCounter,
    /// Block decisions across all relays.
    pub addresses_blocked: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Frames waiting in the dispatch queue.
    pub dispatch_queue_depth: IntGauge,
    /// Addresses currently blocked, summed over relays.
    pub blocked_addresses: IntGauge,
}

impl NodeMetrics {
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let counter = |name: &str, help: &str| -> Result<IntCounter, NodeError> {
            Ok(register_int_counter_with_registry!(Opts::new(name, help), registry)?)
        };
        let gauge = |name: &str, help: &str| -> Result<IntGauge, NodeError> {
            Ok(register_int_gauge_with_registry!(Opts::new(name, help), registry)?)
        };

        let reports_submitted = counter("dagshield_reports_submitted_total", "Threat reports accepted")?;
        let reports_rejected = counter("dagshield_reports_rejected_total", "Threat report submissions rejected")?;
        let reports_verified = counter("dagshield_reports_verified_total", "Threat reports that reached quorum")?;
        let votes_cast = counter("dagshield_votes_cast_total", "Votes accepted")?;
        let alerts_emitted = counter("dagshield_alerts_emitted_total", "Cross-chain alerts emitted")?;
        let alerts_delivered = counter("dagshield_alerts_delivered_total", "Cross-chain alerts processed by a relay")?;
        let alerts_duplicate = counter("dagshield_alerts_duplicate_total", "Duplicate cross-chain deliveries ignored")?;
        let deliveries_dropped = counter("dagshield_deliveries_dropped_total", "Cross-chain messages dropped")?;
        let addresses_blocked = counter("dagshield_addresses_blocked_total", "Block decisions taken")?;
        let dispatch_queue_depth = gauge("dagshield_dispatch_queue_depth", "Messages awaiting delivery")?;
        let blocked_addresses = gauge("dagshield_blocked_addresses", "Addresses currently blocked")?;

        Ok(Self {
            registry,
            reports_submitted,
            reports_rejected,
            reports_verified,
            votes_cast,
            alerts_emitted,
            alerts_delivered,
            alerts_duplicate,
            deliveries_dropped,
            addresses_blocked,
            dispatch_queue_depth,
            blocked_addresses,
        })
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode_text(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| NodeError::Config(format!("metrics output: {e}")))
    }
}
