use crate::access::AccessControl;
use crate::profile::ProfileStore;
use crate::registry::TaskRegistry;
use perk_types::{CallerId, LedgerError, Result, TaskCompletion, TokenAmount};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Append-only log of completion submissions and their approval state. The
/// approval path here is the only writer of balance credits in the system.
pub struct CompletionLedger {
    access: Arc<AccessControl>,
    profiles: Arc<ProfileStore>,
    registry: Arc<TaskRegistry>,
    completions: Arc<RwLock<Vec<TaskCompletion>>>,
}

impl CompletionLedger {
    pub fn new(
        access: Arc<AccessControl>,
        profiles: Arc<ProfileStore>,
        registry: Arc<TaskRegistry>,
    ) -> Self {
        Self {
            access,
            profiles,
            registry,
            completions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Record a completion claim. The caller must be registered and the task
    /// must exist. At most one unapproved record per `(task, user)` pair may
    /// be outstanding; a fresh submission is accepted again once the previous
    /// one is approved.
    pub async fn submit(&self, id: CallerId, task_id: u64) -> Result<TaskCompletion> {
        if self.profiles.get(id).await?.is_none() {
            return Err(LedgerError::Unauthenticated);
        }
        if self.registry.get(task_id).await.is_none() {
            return Err(LedgerError::NotFound(format!("task {}", task_id)));
        }

        // Duplicate check and append under one write guard so a concurrent
        // double-submit cannot slip two pending records in.
        let mut completions = self.completions.write().await;
        let pending_exists = completions
            .iter()
            .any(|c| c.task_id == task_id && c.user_id == id && !c.approved);
        if pending_exists {
            return Err(LedgerError::AlreadySubmitted { task_id });
        }

        let completion = TaskCompletion {
            task_id,
            user_id: id,
            completed_at: chrono::Utc::now(),
            approved: false,
        };
        completions.push(completion.clone());

        info!(
            task_id = task_id,
            caller = %id,
            "📝 Completion submitted"
        );
        Ok(completion)
    }

    /// Approve the oldest pending completion for `(task_id, user_id)` and
    /// credit the task's reward to the user, returning the new balance.
    ///
    /// The completions write guard is held across the credit and the state
    /// flip, so the two effects are observed together or not at all, and two
    /// racing approvals of the same pair resolve to exactly one credit with
    /// the loser seeing `AlreadyApproved`.
    pub async fn approve(
        &self,
        acting: CallerId,
        task_id: u64,
        user_id: CallerId,
    ) -> Result<TokenAmount> {
        self.access.require_admin(acting).await?;

        let mut completions = self.completions.write().await;

        let index = completions
            .iter()
            .position(|c| c.task_id == task_id && c.user_id == user_id && !c.approved);
        let index = match index {
            Some(i) => i,
            None => {
                let approved_exists = completions
                    .iter()
                    .any(|c| c.task_id == task_id && c.user_id == user_id && c.approved);
                if approved_exists {
                    return Err(LedgerError::AlreadyApproved { task_id });
                }
                return Err(LedgerError::NotFound(format!(
                    "completion of task {} by {}",
                    task_id, user_id
                )));
            }
        };

        let task = self
            .registry
            .get(task_id)
            .await
            .ok_or_else(|| LedgerError::NotFound(format!("task {}", task_id)))?;

        // Credit first; the flip only happens once the credit is applied, so
        // a failed credit leaves the record pending and the balance untouched.
        let new_balance = self.profiles.credit(user_id, task.reward).await?;
        completions[index].approved = true;

        info!(
            task_id = task_id,
            user = %user_id,
            acting = %acting,
            reward = task.reward.to_units(),
            balance_after = new_balance.to_units(),
            "✅ Completion approved"
        );
        Ok(new_balance)
    }

    /// All completions for an identity, newest first, pending and approved
    /// alike. Records are never deleted.
    pub async fn list_for(&self, id: CallerId) -> Vec<TaskCompletion> {
        let completions = self.completions.read().await;
        completions
            .iter()
            .rev()
            .filter(|c| c.user_id == id)
            .cloned()
            .collect()
    }
}
