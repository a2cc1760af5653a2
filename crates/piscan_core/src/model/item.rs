//! Scanned product item model.
//!
//! # Invariants
//! - `barcode` is never empty on a decoded item.
//! - New items start unfavorited; only Favorite/Unfavorite change the flag.

use super::account::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned product rowid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Insert payload for a freshly scanned product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub barcode: String,
    pub description: Option<String>,
    /// Caller-owned ordinal, e.g. a rank or pack position.
    pub index: Option<i64>,
}

impl NewItem {
    pub fn new(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }
}

/// A persisted scanned product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub barcode: String,
    pub description: Option<String>,
    pub index: Option<i64>,
    /// Insert time assigned by the store, `YYYY-MM-DD HH:MM:SS` in UTC.
    pub since: Option<String>,
    pub is_favorite: bool,
    pub account_id: AccountId,
}
