use serde::{Deserialize, Serialize};

/// Validation bounds applied to caller-supplied text and amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub max_username_len: usize,
    pub max_title_len: usize,
    pub max_description_len: usize,
    pub max_contact_message_len: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_username_len: 32,
            max_title_len: 120,
            max_description_len: 2000,
            max_contact_message_len: 2000,
        }
    }
}
