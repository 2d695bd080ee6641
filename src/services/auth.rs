//! Owner authorization.
//!
//! The panel has exactly one privileged role: the owner(s). The OAuth
//! handshake that produces an identity lives outside this service; handlers
//! only ever see an opaque identity string and this predicate.

/// Authorization predicate over opaque identities.
pub trait AuthPolicy: Send + Sync {
    fn is_authorized(&self, identity: &str) -> bool;
}

/// Allowlist of owner identities from configuration.
pub struct OwnerAllowlist {
    owner_ids: Vec<String>,
}

impl OwnerAllowlist {
    pub fn new(owner_ids: Vec<String>) -> Self {
        Self { owner_ids }
    }
}

impl AuthPolicy for OwnerAllowlist {
    fn is_authorized(&self, identity: &str) -> bool {
        self.owner_ids.iter().any(|id| id == identity)
    }
}
