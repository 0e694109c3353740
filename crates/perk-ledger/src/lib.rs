/*!
# Perk Ledger

Core of the task-reward service: an office refreshment task board where
admins publish token-rewarded tasks, users submit completion claims, and
admin approval credits the reward to the user's balance.

Component ownership, leaves first:

- **access**: the identity -> role mapping; answers every authorization
  question.
- **profile**: per-identity username and token balance, behind the
  [`storage::ProfileStorage`] seam.
- **registry**: the task catalog with serialized id assignment.
- **completion**: submitted completion claims and their approval state; its
  approval path is the only writer of balance credits.
- **withdrawal**: write-only intake log of withdrawal requests.

Every mutating call is authorization-checked first, each collection lives
behind its own `tokio::sync::RwLock`, and the approval state flip plus the
balance credit are applied under one write guard so they are observed
together or not at all.
*/

pub mod access;
pub mod completion;
pub mod config;
pub mod profile;
pub mod registry;
pub mod storage;
pub mod withdrawal;

pub use access::AccessControl;
pub use completion::CompletionLedger;
pub use config::LedgerConfig;
pub use profile::ProfileStore;
pub use registry::TaskRegistry;
pub use storage::{MemoryStorage, ProfileStorage};
pub use withdrawal::WithdrawalIntake;

use perk_types::CallerId;
use std::sync::Arc;

/// Wires the five components over one shared storage handle.
pub struct LedgerEngine {
    pub access: Arc<AccessControl>,
    pub profiles: Arc<ProfileStore>,
    pub tasks: Arc<TaskRegistry>,
    pub completions: Arc<CompletionLedger>,
    pub withdrawals: Arc<WithdrawalIntake>,
}

impl LedgerEngine {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self::with_config(storage, LedgerConfig::default())
    }

    pub fn with_config(storage: Arc<dyn ProfileStorage>, config: LedgerConfig) -> Self {
        let access = Arc::new(AccessControl::new());
        let profiles = Arc::new(ProfileStore::new(
            storage,
            access.clone(),
            config.clone(),
        ));
        let tasks = Arc::new(TaskRegistry::new(access.clone(), config));
        let completions = Arc::new(CompletionLedger::new(
            access.clone(),
            profiles.clone(),
            tasks.clone(),
        ));
        let withdrawals = Arc::new(WithdrawalIntake::new(access.clone(), profiles.clone()));

        Self {
            access,
            profiles,
            tasks,
            completions,
            withdrawals,
        }
    }

    /// Seed the deployment-time admin. Called once at service construction,
    /// before any traffic; not part of the call surface.
    pub async fn bootstrap_admin(&self, id: CallerId) {
        self.access.bootstrap_admin(id).await;
    }
}
