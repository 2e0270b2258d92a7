//! Threat classification: severity, category and reporter confidence.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest confidence a detection pipeline may report.
pub const MAX_CONFIDENCE: u8 = 100;

/// Severity of a threat on a 1–10 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ThreatLevel(u8);

impl ThreatLevel {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(10);

    pub fn new(level: u8) -> Result<Self, TypeError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(TypeError::InvalidThreatLevel(level))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ThreatLevel {
    type Error = TypeError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<ThreatLevel> for u8 {
    fn from(level: ThreatLevel) -> Self {
        level.0
    }
}

/// Category of malicious on-chain activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ThreatType {
    Phishing = 1,
    RugPull = 2,
    FlashLoanAttack = 3,
    ContractExploit = 4,
    Other = 255,
}

impl ThreatType {
    /// Stable one-byte code used in hashes and signatures.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phishing => "phishing",
            Self::RugPull => "rug_pull",
            Self::FlashLoanAttack => "flash_loan_attack",
            Self::ContractExploit => "contract_exploit",
            Self::Other => "other",
        }
    }
}

impl TryFrom<u8> for ThreatType {
    type Error = TypeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Phishing),
            2 => Ok(Self::RugPull),
            3 => Ok(Self::FlashLoanAttack),
            4 => Ok(Self::ContractExploit),
            255 => Ok(Self::Other),
            other => Err(TypeError::UnknownThreatType(other)),
        }
    }
}

impl fmt::Display for ThreatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that a reporter-supplied confidence lies in 0..=100.
pub fn validate_confidence(confidence: u8) -> Result<u8, TypeError> {
    if confidence > MAX_CONFIDENCE {
        Err(TypeError::InvalidConfidence(confidence))
    } else {
        Ok(confidence)
    }
}
