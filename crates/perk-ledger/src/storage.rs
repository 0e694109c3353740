use async_trait::async_trait;
use perk_types::{CallerId, LedgerError, Result, TokenAmount, UserProfile};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Storage seam for profile records.
///
/// `create` and `credit` are compound operations so a backend can apply them
/// atomically: `create` is check-and-insert, `credit` is a single
/// read-modify-write. A reader must never observe a partially-applied credit.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    async fn load(&self, id: CallerId) -> Result<Option<UserProfile>>;

    /// Insert a profile if none exists. Returns false when the identity is
    /// already registered; the existing record is left untouched.
    async fn create(&self, id: CallerId, profile: UserProfile) -> Result<bool>;

    /// Replace the username, preserving the stored balance. Returns false
    /// when no profile exists.
    async fn rename(&self, id: CallerId, username: String) -> Result<bool>;

    /// Add `amount` to the stored balance and return the new balance.
    async fn credit(&self, id: CallerId, amount: TokenAmount) -> Result<TokenAmount>;

    async fn accounts(&self) -> Result<Vec<CallerId>>;
}

pub struct MemoryStorage {
    profiles: Arc<RwLock<HashMap<CallerId, UserProfile>>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProfileStorage for MemoryStorage {
    async fn load(&self, id: CallerId) -> Result<Option<UserProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&id).cloned())
    }

    async fn create(&self, id: CallerId, profile: UserProfile) -> Result<bool> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&id) {
            return Ok(false);
        }

        info!(
            caller = %id,
            username = %profile.username,
            storage_type = "memory",
            "💾 Profile stored"
        );
        profiles.insert(id, profile);
        Ok(true)
    }

    async fn rename(&self, id: CallerId, username: String) -> Result<bool> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(&id) {
            Some(profile) => {
                profile.username = username;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn credit(&self, id: CallerId, amount: TokenAmount) -> Result<TokenAmount> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| LedgerError::NotFound(format!("profile for {}", id)))?;

        let new_balance = profile
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        info!(
            caller = %id,
            amount = amount.to_units(),
            balance_before = profile.balance.to_units(),
            balance_after = new_balance.to_units(),
            storage_type = "memory",
            "💾 Balance stored"
        );
        profile.balance = new_balance;
        Ok(new_balance)
    }

    async fn accounts(&self) -> Result<Vec<CallerId>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        let id = CallerId::from_bytes([1; 32]);

        assert!(storage.load(id).await.unwrap().is_none());

        let profile = UserProfile {
            username: "alice".to_string(),
            balance: TokenAmount::ZERO,
        };
        assert!(storage.create(id, profile.clone()).await.unwrap());

        // Second create leaves the original untouched
        let other = UserProfile {
            username: "mallory".to_string(),
            balance: TokenAmount::from_units(999),
        };
        assert!(!storage.create(id, other).await.unwrap());
        assert_eq!(storage.load(id).await.unwrap().unwrap(), profile);

        let accounts = storage.accounts().await.unwrap();
        assert_eq!(accounts, vec![id]);
    }

    #[tokio::test]
    async fn test_credit_accumulates() {
        let storage = MemoryStorage::new();
        let id = CallerId::from_bytes([2; 32]);

        storage
            .create(
                id,
                UserProfile {
                    username: "bob".to_string(),
                    balance: TokenAmount::ZERO,
                },
            )
            .await
            .unwrap();

        assert_eq!(
            storage.credit(id, TokenAmount::from_units(10)).await.unwrap(),
            TokenAmount::from_units(10)
        );
        assert_eq!(
            storage.credit(id, TokenAmount::from_units(5)).await.unwrap(),
            TokenAmount::from_units(15)
        );
    }

    #[tokio::test]
    async fn test_credit_unknown_profile() {
        let storage = MemoryStorage::new();
        let result = storage
            .credit(CallerId::from_bytes([3; 32]), TokenAmount::from_units(1))
            .await;
        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_credit_overflow() {
        let storage = MemoryStorage::new();
        let id = CallerId::from_bytes([4; 32]);

        storage
            .create(
                id,
                UserProfile {
                    username: "carol".to_string(),
                    balance: TokenAmount::from_units(u64::MAX),
                },
            )
            .await
            .unwrap();

        let result = storage.credit(id, TokenAmount::from_units(1)).await;
        assert!(matches!(result, Err(LedgerError::BalanceOverflow)));

        // Balance unchanged after the failed credit
        let profile = storage.load(id).await.unwrap().unwrap();
        assert_eq!(profile.balance, TokenAmount::from_units(u64::MAX));
    }

    #[tokio::test]
    async fn test_rename_preserves_balance() {
        let storage = MemoryStorage::new();
        let id = CallerId::from_bytes([5; 32]);

        storage
            .create(
                id,
                UserProfile {
                    username: "dave".to_string(),
                    balance: TokenAmount::ZERO,
                },
            )
            .await
            .unwrap();
        storage.credit(id, TokenAmount::from_units(7)).await.unwrap();

        assert!(storage.rename(id, "david".to_string()).await.unwrap());
        let profile = storage.load(id).await.unwrap().unwrap();
        assert_eq!(profile.username, "david");
        assert_eq!(profile.balance, TokenAmount::from_units(7));

        assert!(!storage
            .rename(CallerId::from_bytes([6; 32]), "nobody".to_string())
            .await
            .unwrap());
    }
}
