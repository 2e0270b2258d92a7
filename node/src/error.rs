use dagshield_types::ChainId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("oracle error: {0}")]
    Oracle(#[from] dagshield_oracle::OracleError),

    #[error("relay error: {0}")]
    Relay(#[from] dagshield_relay::RelayError),

    #[error("registry error: {0}")]
    Registry(#[from] dagshield_registry::RegistryError),

    #[error("invalid value: {0}")]
    Types(#[from] dagshield_types::TypeError),

    #[error("config error: {0}")]
    Config(String),

    #[error("message codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("no relay for chain {0}")]
    UnknownChain(ChainId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
