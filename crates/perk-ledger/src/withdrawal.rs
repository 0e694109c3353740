use crate::access::AccessControl;
use crate::profile::ProfileStore;
use perk_types::{CallerId, LedgerError, Result, TokenAmount, WithdrawalRequest};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Write-only intake log for withdrawal requests. Requests are validated
/// against the balance snapshot at call time and recorded for out-of-band
/// processing; no debit happens here.
pub struct WithdrawalIntake {
    access: Arc<AccessControl>,
    profiles: Arc<ProfileStore>,
    requests: Arc<RwLock<Vec<WithdrawalRequest>>>,
}

impl WithdrawalIntake {
    pub fn new(access: Arc<AccessControl>, profiles: Arc<ProfileStore>) -> Self {
        Self {
            access,
            profiles,
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn request(&self, id: CallerId, amount: TokenAmount) -> Result<WithdrawalRequest> {
        let profile = match self.profiles.get(id).await? {
            Some(profile) => profile,
            None => return Err(LedgerError::Unauthenticated),
        };

        if amount.is_zero() {
            return Err(LedgerError::InvalidInput(
                "withdrawal amount must be positive".to_string(),
            ));
        }
        if amount > profile.balance {
            return Err(LedgerError::InvalidAmount {
                requested: amount,
                available: profile.balance,
            });
        }

        let request = WithdrawalRequest {
            user_id: id,
            amount,
            requested_at: chrono::Utc::now(),
        };

        let mut requests = self.requests.write().await;
        requests.push(request.clone());

        info!(
            caller = %id,
            amount = amount.to_units(),
            balance = profile.balance.to_units(),
            "🏦 Withdrawal requested"
        );
        Ok(request)
    }

    /// The intake log, newest first. Admin only; this is what out-of-band
    /// processing reads.
    pub async fn requests_for_review(&self, acting: CallerId) -> Result<Vec<WithdrawalRequest>> {
        self.access.require_admin(acting).await?;

        let requests = self.requests.read().await;
        Ok(requests.iter().rev().cloned().collect())
    }
}
