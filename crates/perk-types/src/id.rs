use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque caller identity supplied by the external authenticator.
///
/// The ledger never creates or validates these tokens; it only compares them
/// and uses them as map keys. The all-zero value is reserved for the
/// anonymous caller and is rejected wherever authentication is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId([u8; 32]);

impl CallerId {
    pub const ANONYMOUS: Self = Self([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        *self == Self::ANONYMOUS
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            write!(f, "anonymous")
        } else {
            write!(f, "0x{}", hex::encode(&self.0[..8]))
        }
    }
}
