//! Nullable infrastructure for deterministic testing.
//!
//! External inputs (wall-clock time, key material) are abstracted so tests can
//! control them:
//! - [`NullClock`] only moves when told to
//! - [`test_keypair`] / [`test_identity`] derive stable identities from a one-byte seed
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod identities;

pub use clock::NullClock;
pub use identities::{test_identity, test_keypair};
