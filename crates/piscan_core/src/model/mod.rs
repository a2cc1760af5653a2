//! Domain model for scanner client storage.
//!
//! # Responsibility
//! - Define the account and scanned item records exchanged with callers.
//! - Own the anonymous account sentinel values.
//!
//! # Invariants
//! - Identities are store-assigned integer rowids and never set by callers.
//! - Every item is owned by exactly one account.

pub mod account;
pub mod item;
