//! Flagged contract/account addresses in their chain-native format.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A flagged contract or account address on some target chain.
///
/// The format is chain-native and otherwise opaque. Hex addresses (`0x...`)
/// are lower-cased on construction so checksummed and plain spellings of the
/// same EVM address compare, hash and derive report ids identically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetAddress(String);

impl TargetAddress {
    /// Longest accepted address, in bytes.
    pub const MAX_LEN: usize = 128;

    /// Parse and normalise a raw address string.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeError::InvalidAddress("empty address".into()));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidAddress(format!(
                "address longer than {} bytes",
                Self::MAX_LEN
            )));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidAddress(format!(
                "address {trimmed:?} contains whitespace"
            )));
        }
        let normalised = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            trimmed.to_ascii_lowercase()
        } else {
            trimmed.to_string()
        };
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TargetAddress {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TargetAddress> for String {
    fn from(addr: TargetAddress) -> Self {
        addr.0
    }
}
