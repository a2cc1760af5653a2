//! Scan recording use-case service.
//!
//! # Responsibility
//! - Resolve the owning account for a scan, falling back to the anonymous
//!   account when no known email applies.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Items are only ever written or listed under a resolved, persisted account.
//! - Service layer remains storage-agnostic.

use crate::model::account::Account;
use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::account_repo::AccountRepository;
use crate::repo::item_repo::ItemRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for scan recording and retrieval.
pub struct ScanService<A: AccountRepository, I: ItemRepository> {
    accounts: A,
    items: I,
}

impl<A: AccountRepository, I: ItemRepository> ScanService<A, I> {
    pub fn new(accounts: A, items: I) -> Self {
        Self { accounts, items }
    }

    /// Resolves the account registered for `email`.
    ///
    /// Falls back to the anonymous account (creating it if needed) when
    /// `email` is `None`, blank, or not registered.
    pub fn resolve_account(&self, email: Option<&str>) -> RepoResult<Account> {
        let email = email.map(str::trim).filter(|value| !value.is_empty());
        if let Some(email) = email {
            if let Some(account) = self.accounts.lookup_account(email)? {
                return Ok(account);
            }
        }
        self.accounts.fetch_or_create_anonymous()
    }

    /// Records one scan under the resolved owner.
    pub fn record_scan(&self, email: Option<&str>, item: &NewItem) -> RepoResult<ItemId> {
        let owner = self.resolve_account(email)?;
        self.items.add_item(item, &owner)
    }

    pub fn items_for(&self, email: Option<&str>) -> RepoResult<Vec<Item>> {
        let owner = self.resolve_account(email)?;
        self.items.list_items(&owner)
    }

    pub fn favorites_for(&self, email: Option<&str>) -> RepoResult<Vec<Item>> {
        let owner = self.resolve_account(email)?;
        self.items.list_favorite_items(&owner)
    }

    /// Applies Favorite or Unfavorite. Ownership is not checked.
    pub fn set_favorite(&self, id: ItemId, favorite: bool) -> RepoResult<()> {
        if favorite {
            self.items.favorite_item(id)
        } else {
            self.items.unfavorite_item(id)
        }
    }
}
