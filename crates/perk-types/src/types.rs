use crate::amount::TokenAmount;
use crate::id::CallerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization level governing which operations an identity may invoke.
///
/// An identity that was never assigned anything resolves to `Guest`;
/// registration promotes it to `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Guest,
}

/// Task category on the refreshment board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tea,
    Coffee,
    Snacks,
    Meals,
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Available,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Valid status transitions. Approving a completion never moves a task's
    /// status; only the explicit status operation does, and it must respect
    /// this relation.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (Available, InProgress) => true,
            (Available, Completed) => true,
            (InProgress, Completed) => true,

            // Terminal state cannot transition
            (Completed, _) => false,

            _ => false,
        }
    }
}

/// A rewarded task on the board. `id` is assigned by the registry and never
/// reused; `reward` is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub reward: TokenAmount,
    pub category: Category,
    pub status: TaskStatus,
}

/// One per registered identity. Balance only ever grows, and only through
/// completion approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub balance: TokenAmount,
}

/// A user's claim of having performed a task, pending admin approval.
/// Mutated at most once (`approved` false -> true), retained forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task_id: u64,
    pub user_id: CallerId,
    pub completed_at: DateTime<Utc>,
    pub approved: bool,
}

/// Recorded withdrawal intent awaiting out-of-band processing. Recording it
/// does not debit the balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub user_id: CallerId,
    pub amount: TokenAmount,
    pub requested_at: DateTime<Utc>,
}

/// Contact-form message. Side-effect-only intake outside the ledger core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}
