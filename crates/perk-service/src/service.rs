use crate::contact::ContactDesk;
use perk_ledger::{LedgerConfig, LedgerEngine};
use perk_types::{
    CallerId, Category, LedgerError, Result, Role, Task, TaskCompletion, TaskStatus, TokenAmount,
    UserProfile, WithdrawalRequest,
};
use std::sync::Arc;

/// The service's call surface. Each method takes the verified caller
/// identity as its first argument; the transport layer in front of this is
/// expected to hand over exactly what the external authenticator verified.
///
/// Anonymous callers are rejected with `Unauthenticated` on every operation
/// that requires an identity; the two reads marked public need none.
pub struct RewardService {
    engine: Arc<LedgerEngine>,
    contact: ContactDesk,
}

impl RewardService {
    pub fn new(engine: Arc<LedgerEngine>) -> Self {
        Self::with_config(engine, LedgerConfig::default())
    }

    pub fn with_config(engine: Arc<LedgerEngine>, config: LedgerConfig) -> Self {
        Self {
            engine,
            contact: ContactDesk::new(config),
        }
    }

    pub fn engine(&self) -> &Arc<LedgerEngine> {
        &self.engine
    }

    fn require_authenticated(&self, caller: CallerId) -> Result<()> {
        if caller.is_anonymous() {
            return Err(LedgerError::Unauthenticated);
        }
        Ok(())
    }

    /// Add a new task. Admin only.
    pub async fn add_task(
        &self,
        caller: CallerId,
        title: &str,
        description: &str,
        reward: TokenAmount,
        category: Category,
    ) -> Result<Task> {
        self.require_authenticated(caller)?;
        self.engine
            .tasks
            .add(caller, title, description, reward, category)
            .await
    }

    /// Approve a task completion and credit the user's balance. Admin only.
    /// Returns the user's balance after the credit.
    pub async fn approve_task_completion(
        &self,
        caller: CallerId,
        task_id: u64,
        user: CallerId,
    ) -> Result<TokenAmount> {
        self.require_authenticated(caller)?;
        self.engine.completions.approve(caller, task_id, user).await
    }

    /// Assign a role to a user. Admin only.
    pub async fn assign_user_role(
        &self,
        caller: CallerId,
        user: CallerId,
        role: Role,
    ) -> Result<()> {
        self.require_authenticated(caller)?;
        self.engine.access.assign_role(caller, user, role).await
    }

    /// Alias of [`assign_user_role`] retained for older clients, subject to
    /// the same authorization check.
    ///
    /// [`assign_user_role`]: Self::assign_user_role
    pub async fn assign_caller_user_role(
        &self,
        caller: CallerId,
        user: CallerId,
        role: Role,
    ) -> Result<()> {
        self.assign_user_role(caller, user, role).await
    }

    /// Register a new user. Any non-anonymous caller may do this once.
    pub async fn register_user(&self, caller: CallerId, username: &str) -> Result<UserProfile> {
        self.require_authenticated(caller)?;
        self.engine.profiles.register(caller, username).await
    }

    /// The caller's profile, or `None` when never registered. The absence
    /// value drives the first-run profile-setup flow in the client.
    pub async fn get_caller_user_profile(&self, caller: CallerId) -> Result<Option<UserProfile>> {
        self.require_authenticated(caller)?;
        self.engine.profiles.get(caller).await
    }

    /// Update the caller's profile. Only the username is writable; the
    /// stored balance is preserved no matter what the supplied profile says.
    pub async fn save_caller_user_profile(
        &self,
        caller: CallerId,
        profile: UserProfile,
    ) -> Result<UserProfile> {
        self.require_authenticated(caller)?;
        self.engine.profiles.save(caller, profile).await
    }

    /// The caller's profile; fails for unregistered callers.
    pub async fn get_my_profile(&self, caller: CallerId) -> Result<UserProfile> {
        self.require_authenticated(caller)?;
        self.engine
            .profiles
            .get(caller)
            .await?
            .ok_or(LedgerError::Unauthenticated)
    }

    /// Another user's profile, or `None`. Authenticated read.
    pub async fn get_user_profile(
        &self,
        caller: CallerId,
        user: CallerId,
    ) -> Result<Option<UserProfile>> {
        self.require_authenticated(caller)?;
        self.engine.profiles.get(user).await
    }

    /// Get the caller's current balance. Authenticated users only.
    pub async fn get_my_balance(&self, caller: CallerId) -> Result<TokenAmount> {
        self.require_authenticated(caller)?;
        self.engine.profiles.balance_of(caller).await
    }

    /// Get the caller's task completions, newest first. Authenticated users
    /// only.
    pub async fn get_my_completions(&self, caller: CallerId) -> Result<Vec<TaskCompletion>> {
        self.require_authenticated(caller)?;
        Ok(self.engine.completions.list_for(caller).await)
    }

    /// The caller's current role. Never fails; anonymous and unknown callers
    /// are guests.
    pub async fn get_caller_user_role(&self, caller: CallerId) -> Role {
        self.engine.access.role_of(caller).await
    }

    pub async fn is_caller_admin(&self, caller: CallerId) -> bool {
        self.engine.access.is_admin(caller).await
    }

    /// List all available tasks. Public, no auth required.
    pub async fn list_available_tasks(&self) -> Vec<Task> {
        self.engine.tasks.list_available().await
    }

    /// Submit a task completion record. Authenticated users only.
    pub async fn submit_task_completion(
        &self,
        caller: CallerId,
        task_id: u64,
    ) -> Result<TaskCompletion> {
        self.require_authenticated(caller)?;
        self.engine.completions.submit(caller, task_id).await
    }

    /// Request a withdrawal. Authenticated users only; recorded for
    /// out-of-band processing, the balance is not debited.
    pub async fn request_withdrawal(
        &self,
        caller: CallerId,
        amount: TokenAmount,
    ) -> Result<WithdrawalRequest> {
        self.require_authenticated(caller)?;
        self.engine.withdrawals.request(caller, amount).await
    }

    /// Move a task through its status lifecycle. Admin only.
    pub async fn set_task_status(
        &self,
        caller: CallerId,
        task_id: u64,
        status: TaskStatus,
    ) -> Result<Task> {
        self.require_authenticated(caller)?;
        self.engine.tasks.set_status(caller, task_id, status).await
    }

    /// The withdrawal intake log, newest first. Admin only.
    pub async fn list_withdrawal_requests(
        &self,
        caller: CallerId,
    ) -> Result<Vec<WithdrawalRequest>> {
        self.require_authenticated(caller)?;
        self.engine.withdrawals.requests_for_review(caller).await
    }

    /// Submit a contact form. Public, no auth required.
    pub async fn submit_contact_form(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<()> {
        self.contact.submit(name, email, message).await
    }

    /// Received contact messages, newest first. Admin only.
    pub async fn list_contact_messages(
        &self,
        caller: CallerId,
    ) -> Result<Vec<perk_types::ContactMessage>> {
        self.require_authenticated(caller)?;
        self.engine.access.require_admin(caller).await?;
        Ok(self.contact.messages().await)
    }
}
