//! Report consensus for the DAGShield network.
//!
//! Lifecycle of a report:
//! 1. **Submission**: an authorized node submits a signed observation; it lands
//!    in the append-only ledger unverified, with the reporter's own agreement
//!    counted as the first vote.
//! 2. **Voting**: other authorized nodes vote inside a fixed window after
//!    submission. Late votes are rejected outright.
//! 3. **Verification**: once agreeing votes reach the larger of the chain's
//!    threshold and the network-wide floor, the report flips to verified
//!    (terminal). High-severity reports yield one propagation intent per other
//!    active chain.
//!
//! A report that never reaches quorum stays unverified forever and reads as
//! [`ReportStatus::Expired`] once its window has closed.

pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod propagation;
pub mod report;
pub mod voting;

pub use engine::{ConsensusEngine, SubmitOutcome, VoteOutcome};
pub use error::{LedgerError, OracleError};
pub use events::OracleEvent;
pub use ledger::{MemoryLedger, ReportLedger};
pub use propagation::{CrossChainAlert, PropagationIntent};
pub use report::{ReportStatus, ThreatReport};
pub use voting::{effective_quorum, VoteRecord};
