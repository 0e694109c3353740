use crate::amount::TokenAmount;
use thiserror::Error;

/// Ledger operation result type
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Every rejected precondition surfaces one of these kinds so callers can
/// render a specific message. No variant is ever swallowed or retried.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Caller lacks the required role")]
    Unauthorized,

    #[error("Operation requires an authenticated caller")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A profile is already registered for this caller")]
    AlreadyRegistered,

    #[error("A pending completion for task {task_id} already exists")]
    AlreadySubmitted { task_id: u64 },

    #[error("Completion for task {task_id} is already approved")]
    AlreadyApproved { task_id: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid amount: requested {requested}, available {available}")]
    InvalidAmount {
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("Balance overflow")]
    BalanceOverflow,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
