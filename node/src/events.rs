//! Node-level event stream.
//!
//! Consumers subscribe through [`crate::ThreatNode::subscribe`]. Events are
//! published after the state change they describe has been committed.

use dagshield_oracle::OracleEvent;
use dagshield_relay::RelayEvent;
use dagshield_types::ChainId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeEvent {
    /// Report lifecycle: submission, votes, verification, alert fan-out.
    Oracle(OracleEvent),
    /// Receipt, scoring and blocking on one chain.
    Relay { chain_id: ChainId, event: RelayEvent },
    /// A message gave up after repeated delivery failures.
    DeliveryDropped { target_chain: ChainId, attempts: u32 },
}
