//! Signing keys held by reporters, voters and administrators.
//!
//! A node's [`Identity`] is its Ed25519 public key, so a report signature is
//! checked directly against the identity of the caller that submitted it.

use crate::identity::Identity;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Public half of a node's signing key. Same bytes as its [`Identity`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Ed25519 secret seed. Never printed or serialized; wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// Ed25519 signature over a report digest.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// The `R` and `s` halves, in that order.
    fn halves(&self) -> ([u8; 32], [u8; 32]) {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&self.0[..32]);
        s.copy_from_slice(&self.0[32..]);
        (r, s)
    }

    fn from_halves(r: [u8; 32], s: [u8; 32]) -> Self {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&r);
        bytes[32..].copy_from_slice(&s);
        Self(bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", crate::hash::hex::encode(&self.0[..8]))
    }
}

// Serde handles arrays up to 32 elements, so a signature travels as its two halves.
impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.halves().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (r, s) = <([u8; 32], [u8; 32])>::deserialize(deserializer)?;
        Ok(Self::from_halves(r, s))
    }
}

/// A reporter's signing key pair.
///
/// Built by `dagshield_crypto::generate_keypair` or
/// `dagshield_crypto::keypair_from_seed`.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    /// The identity this key pair reports and votes as.
    pub fn identity(&self) -> Identity {
        Identity::from_public_key(&self.public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_survives_bincode() {
        let mut bytes = [0u8; 64];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        let sig = Signature(bytes);
        let encoded = bincode::serialize(&sig).unwrap();
        assert_eq!(encoded.len(), 64);
        let decoded: Signature = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, sig);
    }

    #[test]
    fn identity_is_the_public_key() {
        let pair = KeyPair {
            public: PublicKey([5u8; 32]),
            private: PrivateKey([0u8; 32]),
        };
        assert_eq!(pair.identity().as_bytes(), pair.public.as_bytes());
    }
}
