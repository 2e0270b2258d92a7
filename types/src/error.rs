//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("threat level {0} is outside 1..=10")]
    InvalidThreatLevel(u8),

    #[error("confidence {0} is outside 0..=100")]
    InvalidConfidence(u8),

    #[error("unknown threat type code {0}")]
    UnknownThreatType(u8),

    #[error("invalid target address: {0}")]
    InvalidAddress(String),

    #[error("invalid network parameters: {0}")]
    InvalidParams(String),
}
