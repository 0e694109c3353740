use perk_types::{CallerId, LedgerError, Result, Role};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Owns the identity -> role mapping and answers every authorization
/// question in the system. Lookups never fail: an identity that was never
/// assigned anything is a `Guest`.
pub struct AccessControl {
    roles: Arc<RwLock<HashMap<CallerId, Role>>>,
}

impl Default for AccessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessControl {
    pub fn new() -> Self {
        Self {
            roles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn role_of(&self, id: CallerId) -> Role {
        if id.is_anonymous() {
            return Role::Guest;
        }
        let roles = self.roles.read().await;
        roles.get(&id).copied().unwrap_or(Role::Guest)
    }

    pub async fn is_admin(&self, id: CallerId) -> bool {
        self.role_of(id).await == Role::Admin
    }

    pub async fn require_admin(&self, id: CallerId) -> Result<()> {
        if self.is_admin(id).await {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }

    /// Assign a role to `target`, overwriting any prior assignment. There is
    /// no assignment history. Fails unless `acting` currently holds `Admin`.
    pub async fn assign_role(&self, acting: CallerId, target: CallerId, role: Role) -> Result<()> {
        self.require_admin(acting).await?;

        if target.is_anonymous() {
            return Err(LedgerError::InvalidInput(
                "cannot assign a role to the anonymous caller".to_string(),
            ));
        }

        let mut roles = self.roles.write().await;
        let previous = roles.insert(target, role);

        info!(
            acting = %acting,
            target = %target,
            role = ?role,
            previous = ?previous,
            "🔑 Role assigned"
        );
        Ok(())
    }

    /// Registration promotes a fresh identity to `User`. A role assigned by
    /// an admin beforehand is kept.
    pub(crate) async fn promote_to_user(&self, id: CallerId) {
        let mut roles = self.roles.write().await;
        let entry = roles.entry(id).or_insert(Role::Guest);
        if *entry == Role::Guest {
            *entry = Role::User;
            info!(caller = %id, "🔑 Promoted to user on registration");
        }
    }

    /// Seed the deployment-time owner. Not reachable through the call
    /// surface; the service wires it up at construction.
    pub async fn bootstrap_admin(&self, id: CallerId) {
        if id.is_anonymous() {
            return;
        }
        let mut roles = self.roles.write().await;
        roles.insert(id, Role::Admin);
        info!(caller = %id, "🔑 Bootstrap admin seeded");
    }
}
