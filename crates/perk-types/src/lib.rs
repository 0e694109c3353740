pub mod amount;
pub mod error;
pub mod id;
pub mod types;

pub use amount::TokenAmount;
pub use error::{LedgerError, Result};
pub use id::CallerId;
pub use types::{
    Category, ContactMessage, Role, Task, TaskCompletion, TaskStatus, UserProfile,
    WithdrawalRequest,
};
