use dagshield_types::ChainId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is not the administrative authority")]
    NotAdmin(String),

    #[error("identity {0} cannot authorize itself")]
    SelfAuthorization(String),

    #[error("consensus threshold for chain {0} must be non-zero")]
    ZeroThreshold(ChainId),

    #[error("minimum confidence {0} is outside 0..=100")]
    InvalidMinConfidence(u8),
}
