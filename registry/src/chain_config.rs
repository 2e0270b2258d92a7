//! Per-chain policy store.

use crate::authority::AdminPolicy;
use crate::error::RegistryError;
use dagshield_types::{ChainId, Identity, MAX_CONFIDENCE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Policy for one target chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub active: bool,
    /// Reports below this confidence are rejected on submission.
    pub min_confidence: u8,
    /// Agreeing votes (reporter included) required to verify.
    pub consensus_threshold: u32,
    /// Where the chain's relay listens, if it has one registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_endpoint: Option<String>,
}

impl ChainConfig {
    /// What an unconfigured chain reads as. Callers must check `active`.
    pub fn inactive() -> Self {
        Self {
            active: false,
            min_confidence: MAX_CONFIDENCE,
            consensus_threshold: u32::MAX,
            relay_endpoint: None,
        }
    }
}

/// A chain entry used to seed the store at start-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSeed {
    pub chain_id: ChainId,
    #[serde(flatten)]
    pub config: ChainConfig,
}

/// Read-only view of the chain policy.
pub trait ChainDirectory: Send + Sync {
    /// Configuration for `chain`, or [`ChainConfig::inactive`] if unknown.
    fn config(&self, chain: ChainId) -> ChainConfig;

    /// All active chains in ascending id order.
    fn active_chains(&self) -> Vec<ChainId>;
}

/// Holds every chain's policy; writable only by the administrative authority.
pub struct ChainConfigStore {
    admin: Arc<dyn AdminPolicy>,
    chains: RwLock<BTreeMap<ChainId, ChainConfig>>,
}

impl ChainConfigStore {
    pub fn new(admin: Arc<dyn AdminPolicy>) -> Self {
        Self {
            admin,
            chains: RwLock::new(BTreeMap::new()),
        }
    }

    /// Build a store pre-populated with the initial chain set.
    ///
    /// Seeds go through the same validation as [`ChainConfigStore::set_config`].
    pub fn seeded(
        admin: Arc<dyn AdminPolicy>,
        seeds: impl IntoIterator<Item = ChainSeed>,
    ) -> Result<Self, RegistryError> {
        let store = Self::new(admin);
        {
            let mut chains = store.chains.write().unwrap_or_else(PoisonError::into_inner);
            for seed in seeds {
                validate(seed.chain_id, &seed.config)?;
                chains.insert(seed.chain_id, seed.config);
            }
        }
        Ok(store)
    }

    /// Add a chain or replace all four fields of an existing one at once.
    pub fn set_config(
        &self,
        caller: &Identity,
        chain: ChainId,
        config: ChainConfig,
    ) -> Result<(), RegistryError> {
        if !self.admin.is_admin(caller) {
            return Err(RegistryError::NotAdmin(caller.to_string()));
        }
        validate(chain, &config)?;
        tracing::info!(
            %chain,
            active = config.active,
            min_confidence = config.min_confidence,
            threshold = config.consensus_threshold,
            "chain configuration updated"
        );
        self.chains
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chain, config);
        Ok(())
    }

    pub fn is_configured(&self, chain: ChainId) -> bool {
        self.chains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&chain)
    }

    /// Every configured chain, active or not, in ascending id order.
    pub fn configured_chains(&self) -> Vec<ChainId> {
        self.chains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }
}

impl ChainDirectory for ChainConfigStore {
    fn config(&self, chain: ChainId) -> ChainConfig {
        self.chains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chain)
            .cloned()
            .unwrap_or_else(ChainConfig::inactive)
    }

    fn active_chains(&self) -> Vec<ChainId> {
        self.chains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, config)| config.active)
            .map(|(chain, _)| *chain)
            .collect()
    }
}

fn validate(chain: ChainId, config: &ChainConfig) -> Result<(), RegistryError> {
    if config.min_confidence > MAX_CONFIDENCE {
        return Err(RegistryError::InvalidMinConfidence(config.min_confidence));
    }
    if config.consensus_threshold == 0 {
        return Err(RegistryError::ZeroThreshold(chain));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::SingleAdmin;
    use dagshield_nullables::test_identity;

    fn active(min_confidence: u8, consensus_threshold: u32) -> ChainConfig {
        ChainConfig {
            active: true,
            min_confidence,
            consensus_threshold,
            relay_endpoint: None,
        }
    }

    fn store() -> (Identity, ChainConfigStore) {
        let admin = test_identity(0);
        (admin, ChainConfigStore::new(Arc::new(SingleAdmin::new(admin))))
    }

    #[test]
    fn unconfigured_chain_reads_inactive() {
        let (_, store) = store();
        let config = store.config(ChainId::new(999));
        assert!(!config.active);
        assert_eq!(config, ChainConfig::inactive());
        assert!(!store.is_configured(ChainId::new(999)));
    }

    #[test]
    fn admin_sets_and_replaces_config() {
        let (admin, store) = store();
        let chain = ChainId::new(1);
        store.set_config(&admin, chain, active(75, 3)).unwrap();
        assert_eq!(store.config(chain), active(75, 3));

        let replaced = ChainConfig {
            active: false,
            min_confidence: 50,
            consensus_threshold: 5,
            relay_endpoint: Some("relay://chain-1".into()),
        };
        store.set_config(&admin, chain, replaced.clone()).unwrap();
        assert_eq!(store.config(chain), replaced);
        assert!(store.active_chains().is_empty());
        assert_eq!(store.configured_chains(), vec![chain]);
    }

    #[test]
    fn non_admin_rejected_without_change() {
        let (admin, store) = store();
        let chain = ChainId::new(1);
        store.set_config(&admin, chain, active(75, 3)).unwrap();

        let err = store
            .set_config(&test_identity(9), chain, active(0, 1))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAdmin(_)));
        assert_eq!(store.config(chain), active(75, 3));
    }

    #[test]
    fn zero_threshold_rejected() {
        let (admin, store) = store();
        let err = store
            .set_config(&admin, ChainId::new(1), active(75, 0))
            .unwrap_err();
        assert_eq!(err, RegistryError::ZeroThreshold(ChainId::new(1)));
        assert!(!store.is_configured(ChainId::new(1)));
    }

    #[test]
    fn min_confidence_above_hundred_rejected() {
        let (admin, store) = store();
        let err = store
            .set_config(&admin, ChainId::new(1), active(101, 3))
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidMinConfidence(101));
    }

    #[test]
    fn active_chains_sorted_and_filtered() {
        let admin = test_identity(0);
        let seeds = [137u64, 1, 56].into_iter().map(|id| ChainSeed {
            chain_id: ChainId::new(id),
            config: active(75, 3),
        });
        let store = ChainConfigStore::seeded(Arc::new(SingleAdmin::new(admin)), seeds).unwrap();
        let mut off = active(75, 3);
        off.active = false;
        store.set_config(&admin, ChainId::new(56), off).unwrap();

        assert_eq!(
            store.active_chains(),
            vec![ChainId::new(1), ChainId::new(137)]
        );
    }

    #[test]
    fn seeding_validates_entries() {
        let admin = test_identity(0);
        let seeds = [ChainSeed {
            chain_id: ChainId::new(10),
            config: active(75, 0),
        }];
        let result = ChainConfigStore::seeded(Arc::new(SingleAdmin::new(admin)), seeds);
        assert!(matches!(result, Err(RegistryError::ZeroThreshold(_))));
    }
}
