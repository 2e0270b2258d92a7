//! Administrative capability checks.
//!
//! Mutation of shared state is gated by an [`AdminPolicy`], independent of how
//! the caller was authenticated.

use dagshield_types::Identity;
use std::collections::BTreeSet;

/// Decides whether a caller holds the administrative authority.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, caller: &Identity) -> bool;
}

/// A single administrator identity.
#[derive(Clone, Debug)]
pub struct SingleAdmin(Identity);

impl SingleAdmin {
    pub fn new(admin: Identity) -> Self {
        Self(admin)
    }

    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl AdminPolicy for SingleAdmin {
    fn is_admin(&self, caller: &Identity) -> bool {
        self.0 == *caller
    }
}

/// Any member of a fixed set of identities is an administrator.
#[derive(Clone, Debug, Default)]
pub struct AdminSet(BTreeSet<Identity>);

impl AdminSet {
    pub fn new(admins: impl IntoIterator<Item = Identity>) -> Self {
        Self(admins.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AdminPolicy for AdminSet {
    fn is_admin(&self, caller: &Identity) -> bool {
        self.0.contains(caller)
    }
}
