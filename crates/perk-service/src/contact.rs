use perk_ledger::LedgerConfig;
use perk_types::{ContactMessage, LedgerError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Public contact-form intake. Side-effect-only notification log, entirely
/// outside the ledger core: no identity, no authorization, no balances.
pub struct ContactDesk {
    messages: Arc<RwLock<Vec<ContactMessage>>>,
    config: LedgerConfig,
}

impl ContactDesk {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            config,
        }
    }

    pub async fn submit(&self, name: &str, email: &str, message: &str) -> Result<()> {
        let name = required(name, "name")?;
        let email = required(email, "email")?;
        let message = required(message, "message")?;
        if message.chars().count() > self.config.max_contact_message_len {
            return Err(LedgerError::InvalidInput(format!(
                "message exceeds {} characters",
                self.config.max_contact_message_len
            )));
        }

        let record = ContactMessage {
            name,
            email,
            message,
            received_at: chrono::Utc::now(),
        };

        let mut messages = self.messages.write().await;
        messages.push(record.clone());

        info!(
            name = %record.name,
            email = %record.email,
            "📨 Contact message received"
        );
        Ok(())
    }

    /// Received messages, newest first.
    pub async fn messages(&self) -> Vec<ContactMessage> {
        let messages = self.messages.read().await;
        messages.iter().rev().cloned().collect()
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}
