//! Shared registries for the DAGShield network.
//!
//! - **Identity registry**: which reporting identities may submit and vote.
//! - **Chain configuration store**: per-target-chain policy (active flag,
//!   minimum confidence, consensus threshold, relay endpoint).
//! - **Admin capability**: the permission check that gates every mutation.
//!
//! Both stores are shared via `Arc` between the consensus engine and the relays,
//! which only see them through the narrow [`Authorizer`] and [`ChainDirectory`]
//! traits. Every write happens under a single lock, so readers never observe a
//! partially applied update.

pub mod authority;
pub mod chain_config;
pub mod error;
pub mod identity;

pub use authority::{AdminPolicy, AdminSet, SingleAdmin};
pub use chain_config::{ChainConfig, ChainConfigStore, ChainDirectory, ChainSeed};
pub use error::RegistryError;
pub use identity::{Authorizer, IdentityRegistry};
