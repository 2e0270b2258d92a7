//! The set of quarantined addresses, with the decision that put each there.

use dagshield_types::{ChainId, TargetAddress, ThreatLevel, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What put an address on the block list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockSource {
    /// A received alert at or above the auto-block level.
    Auto,
    /// An administrator.
    Manual,
    /// An emergency block fanned out from another chain.
    Emergency { origin_chain: ChainId },
}

/// Audit record for a blocked address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Deciding severity.
    pub threat_level: ThreatLevel,
    pub source: BlockSource,
    pub blocked_at: Timestamp,
}

#[derive(Clone, Debug, Default)]
pub struct BlockList {
    entries: BTreeMap<TargetAddress, BlockRecord>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless already present. The first decision is kept.
    pub fn block(&mut self, target: TargetAddress, record: BlockRecord) -> bool {
        if self.entries.contains_key(&target) {
            return false;
        }
        self.entries.insert(target, record);
        true
    }

    pub fn unblock(&mut self, target: &TargetAddress) -> Option<BlockRecord> {
        self.entries.remove(target)
    }

    pub fn contains(&self, target: &TargetAddress) -> bool {
        self.entries.contains_key(target)
    }

    pub fn get(&self, target: &TargetAddress) -> Option<&BlockRecord> {
        self.entries.get(target)
    }

    /// Blocked addresses in ascending order.
    pub fn addresses(&self) -> Vec<TargetAddress> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
