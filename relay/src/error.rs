use dagshield_types::TargetAddress;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("{0} is not the configured propagation source")]
    UnauthorizedSource(String),

    #[error("{0} is not an administrator")]
    NotAdmin(String),

    #[error("invalid severity {0}: must be 1–10")]
    InvalidSeverity(u8),

    #[error("address {0} is not blocked")]
    NotBlocked(TargetAddress),
}
