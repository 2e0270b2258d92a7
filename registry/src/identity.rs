//! Identity & authorization registry.

use crate::authority::AdminPolicy;
use crate::error::RegistryError;
use dagshield_types::Identity;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Read-only view of the authorization set.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, identity: &Identity) -> bool;
}

/// Tracks which identities may currently submit reports and vote.
///
/// Changes take effect for the next call that checks authorization. Reports
/// and votes already recorded are never revisited.
pub struct IdentityRegistry {
    admin: Arc<dyn AdminPolicy>,
    authorized: RwLock<HashSet<Identity>>,
}

impl IdentityRegistry {
    pub fn new(admin: Arc<dyn AdminPolicy>) -> Self {
        Self {
            admin,
            authorized: RwLock::new(HashSet::new()),
        }
    }

    /// Build a registry with the start-up authorization set.
    ///
    /// Seeding is done by whoever constructs the node, so it is not subject to
    /// the administrator and self-authorization checks of [`Self::authorize`].
    pub fn seeded(admin: Arc<dyn AdminPolicy>, identities: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            admin,
            authorized: RwLock::new(identities.into_iter().collect()),
        }
    }

    /// Grant submit/vote rights. Returns `true` if the identity was not
    /// already authorized.
    pub fn authorize(&self, caller: &Identity, identity: Identity) -> Result<bool, RegistryError> {
        self.ensure_admin(caller)?;
        if *caller == identity {
            return Err(RegistryError::SelfAuthorization(identity.to_string()));
        }
        let added = self
            .authorized
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identity);
        if added {
            tracing::info!(%identity, "identity authorized");
        }
        Ok(added)
    }

    /// Withdraw submit/vote rights. Returns `true` if the identity was
    /// authorized before the call.
    pub fn revoke(&self, caller: &Identity, identity: &Identity) -> Result<bool, RegistryError> {
        self.ensure_admin(caller)?;
        let removed = self
            .authorized
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identity);
        if removed {
            tracing::info!(%identity, "identity revoked");
        }
        Ok(removed)
    }

    pub fn authorized_count(&self) -> usize {
        self.authorized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn ensure_admin(&self, caller: &Identity) -> Result<(), RegistryError> {
        if self.admin.is_admin(caller) {
            Ok(())
        } else {
            Err(RegistryError::NotAdmin(caller.to_string()))
        }
    }
}

impl Authorizer for IdentityRegistry {
    fn is_authorized(&self, identity: &Identity) -> bool {
        self.authorized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(identity)
    }
}
