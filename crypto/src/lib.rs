//! Cryptographic primitives for DAGShield.
//!
//! - **Ed25519** for report signatures and node identities
//! - **Blake2b** for report digests and content-addressed report ids

pub mod hash;
pub mod keys;
pub mod report;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use report::{derive_report_id, report_digest, sign_report, verify_report};
pub use sign::{sign_message, verify_signature};
