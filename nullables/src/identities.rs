//! Deterministic identities for tests.

use dagshield_types::{Identity, KeyPair};

/// Key pair derived from a 32-byte seed filled with `seed`.
pub fn test_keypair(seed: u8) -> KeyPair {
    dagshield_crypto::keypair_from_seed(&[seed; 32])
}

/// Identity of [`test_keypair`]`(seed)`.
pub fn test_identity(seed: u8) -> Identity {
    test_keypair(seed).identity()
}
