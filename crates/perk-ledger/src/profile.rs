use crate::access::AccessControl;
use crate::config::LedgerConfig;
use crate::storage::ProfileStorage;
use perk_types::{CallerId, LedgerError, Result, TokenAmount, UserProfile};
use std::sync::Arc;
use tracing::info;

/// Holds per-identity username and token balance. The completion ledger is
/// the only writer of balance credits; everything else reads.
pub struct ProfileStore {
    storage: Arc<dyn ProfileStorage>,
    access: Arc<AccessControl>,
    config: LedgerConfig,
}

impl ProfileStore {
    pub fn new(
        storage: Arc<dyn ProfileStorage>,
        access: Arc<AccessControl>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            storage,
            access,
            config,
        }
    }

    /// Register a profile for `id` with a zero balance, and promote the
    /// caller's role from `Guest` to `User` in the same call so the role map
    /// and profile store stay consistent without a second round trip.
    pub async fn register(&self, id: CallerId, username: &str) -> Result<UserProfile> {
        let username = self.validate_username(username)?;
        let profile = UserProfile {
            username,
            balance: TokenAmount::ZERO,
        };

        let created = self.storage.create(id, profile.clone()).await?;
        if !created {
            return Err(LedgerError::AlreadyRegistered);
        }

        self.access.promote_to_user(id).await;

        info!(
            caller = %id,
            username = %profile.username,
            "👤 User registered"
        );
        Ok(profile)
    }

    /// `None` means never registered, which is distinct from a registered
    /// profile with a zero balance.
    pub async fn get(&self, id: CallerId) -> Result<Option<UserProfile>> {
        self.storage.load(id).await
    }

    /// Update the caller's username. The stored balance is preserved
    /// unconditionally; the supplied profile's balance field is ignored since
    /// balance mutation belongs to the approval path alone.
    pub async fn save(&self, id: CallerId, profile: UserProfile) -> Result<UserProfile> {
        let username = self.validate_username(&profile.username)?;

        let renamed = self.storage.rename(id, username).await?;
        if !renamed {
            return Err(LedgerError::NotFound(format!("profile for {}", id)));
        }

        info!(caller = %id, "👤 Profile saved");
        self.storage
            .load(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("profile for {}", id)))
    }

    /// Additive-only balance mutation, applied atomically in the storage
    /// backend. Only the completion ledger calls this.
    pub(crate) async fn credit(&self, id: CallerId, amount: TokenAmount) -> Result<TokenAmount> {
        let new_balance = self.storage.credit(id, amount).await?;

        info!(
            caller = %id,
            amount = amount.to_units(),
            balance_after = new_balance.to_units(),
            "💰 Balance credited"
        );
        Ok(new_balance)
    }

    /// Balance of a registered caller. An unregistered identity fails with
    /// `Unauthenticated` rather than defaulting to zero.
    pub async fn balance_of(&self, id: CallerId) -> Result<TokenAmount> {
        match self.storage.load(id).await? {
            Some(profile) => Ok(profile.balance),
            None => Err(LedgerError::Unauthenticated),
        }
    }

    fn validate_username(&self, username: &str) -> Result<String> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > self.config.max_username_len {
            return Err(LedgerError::InvalidInput(format!(
                "username exceeds {} characters",
                self.config.max_username_len
            )));
        }
        Ok(trimmed.to_string())
    }
}
