//! Cross-chain relay and risk engine.
//!
//! One [`RelayEngine`] runs per target chain. It accepts verified alerts from the
//! configured propagation source only, and processes each
//! (source chain, report id, target) key at most once, so at-least-once
//! delivery never double-counts risk.
//!
//! Address lifecycle:
//! `Unscored → Scored (risk > 0) → Blocked → Unscored (explicit unblock only)`.
//! Risk never decays on its own.

pub mod blocklist;
pub mod engine;
pub mod error;
pub mod events;
pub mod risk;
pub mod threat;

pub use blocklist::{BlockList, BlockRecord, BlockSource};
pub use engine::{ReceiveOutcome, RelayEngine};
pub use error::RelayError;
pub use events::RelayEvent;
pub use risk::RiskScore;
pub use threat::{CrossChainThreat, ThreatKey, ThreatNotice};
