use crate::access::AccessControl;
use crate::config::LedgerConfig;
use perk_types::{CallerId, Category, LedgerError, Result, Task, TaskStatus, TokenAmount};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Task table plus the id counter, behind one lock so id assignment is
/// serialized and ids are never reused.
struct TaskTable {
    next_id: u64,
    tasks: BTreeMap<u64, Task>,
}

/// Catalog of tasks and their lifecycle status. Tasks are created by admins,
/// readable by anyone, and never deleted.
pub struct TaskRegistry {
    access: Arc<AccessControl>,
    inner: Arc<RwLock<TaskTable>>,
    config: LedgerConfig,
}

impl TaskRegistry {
    pub fn new(access: Arc<AccessControl>, config: LedgerConfig) -> Self {
        Self {
            access,
            inner: Arc::new(RwLock::new(TaskTable {
                next_id: 1,
                tasks: BTreeMap::new(),
            })),
            config,
        }
    }

    /// Create a task. Admin only. The reward is immutable after creation.
    pub async fn add(
        &self,
        acting: CallerId,
        title: &str,
        description: &str,
        reward: TokenAmount,
        category: Category,
    ) -> Result<Task> {
        self.access.require_admin(acting).await?;

        if reward.is_zero() {
            return Err(LedgerError::InvalidInput(
                "reward must be positive".to_string(),
            ));
        }
        let title = self.validate_text(title, "title", self.config.max_title_len)?;
        let description =
            self.validate_text(description, "description", self.config.max_description_len)?;

        let mut table = self.inner.write().await;
        let id = table.next_id;
        table.next_id += 1;

        let task = Task {
            id,
            title,
            description,
            reward,
            category,
            status: TaskStatus::Available,
        };
        table.tasks.insert(id, task.clone());

        info!(
            task_id = id,
            title = %task.title,
            reward = reward.to_units(),
            category = ?category,
            "📋 Task added"
        );
        Ok(task)
    }

    pub async fn get(&self, task_id: u64) -> Option<Task> {
        let table = self.inner.read().await;
        table.tasks.get(&task_id).cloned()
    }

    /// Tasks currently in `Available` status, ascending by id. Repeated calls
    /// with no intervening writes return identical results.
    pub async fn list_available(&self) -> Vec<Task> {
        let table = self.inner.read().await;
        table
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Available)
            .cloned()
            .collect()
    }

    /// Move a task through its status lifecycle. Admin only; the transition
    /// relation on `TaskStatus` is the policy. Completion approval never goes
    /// through here.
    pub async fn set_status(
        &self,
        acting: CallerId,
        task_id: u64,
        status: TaskStatus,
    ) -> Result<Task> {
        self.access.require_admin(acting).await?;

        let mut table = self.inner.write().await;
        let task = table
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| LedgerError::NotFound(format!("task {}", task_id)))?;

        if !task.status.can_transition_to(&status) {
            return Err(LedgerError::InvalidInput(format!(
                "invalid status transition {:?} -> {:?}",
                task.status, status
            )));
        }

        let previous = task.status;
        task.status = status;

        info!(
            task_id = task_id,
            from = ?previous,
            to = ?status,
            "📋 Task status changed"
        );
        Ok(task.clone())
    }

    fn validate_text(&self, value: &str, field: &str, max_len: usize) -> Result<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidInput(format!(
                "{} must not be empty",
                field
            )));
        }
        if trimmed.chars().count() > max_len {
            return Err(LedgerError::InvalidInput(format!(
                "{} exceeds {} characters",
                field, max_len
            )));
        }
        Ok(trimmed.to_string())
    }
}
