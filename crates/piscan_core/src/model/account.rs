//! Account domain model.
//!
//! # Invariants
//! - At most one account exists per email.
//! - The anonymous account exists once bootstrap has run.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Email of the fallback account owning unattributed scans.
pub const ANONYMOUS_EMAIL: &str = "anonymous@example.org";

/// API code of the fallback account.
pub const ANONYMOUS_API_CODE: &str = "12345678-abcd-9ef0-1234-567890abcdef";

/// Store-assigned account rowid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered client account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Zero until the account has been read back from the store.
    pub id: AccountId,
    pub email: String,
    /// Opaque credential used against the remote API.
    pub api_code: String,
}

impl Account {
    /// Creates an account that has not been persisted yet.
    pub fn new(email: impl Into<String>, api_code: impl Into<String>) -> Self {
        Self {
            id: AccountId(0),
            email: email.into(),
            api_code: api_code.into(),
        }
    }

    /// The sentinel anonymous account, not yet persisted.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_EMAIL, ANONYMOUS_API_CODE)
    }

    /// Whether the account carries a store-assigned identity.
    pub fn is_persisted(&self) -> bool {
        self.id.0 > 0
    }
}
