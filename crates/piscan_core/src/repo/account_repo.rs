//! Account repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide add/update/lookup/list APIs over the `account` table.
//! - Own the get-or-create bootstrap of the anonymous account.
//!
//! # Invariants
//! - Absence is `Ok(None)`, never an error.
//! - Rows with a NULL email or API code are skipped on read; empty strings
//!   are ordinary values.
//! - Writes never mutate the caller's `Account` value.

use crate::model::account::{Account, AccountId, ANONYMOUS_EMAIL};
use crate::repo::{
    decode_error, is_unique_violation, optional_text, RepoError, RepoResult, RowDecode,
};
use log::{debug, info};
use rusqlite::{named_params, Connection, Row};

/// Repository interface for account operations.
pub trait AccountRepository {
    /// Inserts a new account and returns its store-assigned id.
    fn add_account(&self, account: &Account) -> RepoResult<AccountId>;
    /// Rewrites email and API code of the row matching `account.id`.
    fn update_account(&self, account: &Account, new_email: &str, new_api_code: &str)
        -> RepoResult<()>;
    /// Finds the first complete account registered under `email`.
    fn lookup_account(&self, email: &str) -> RepoResult<Option<Account>>;
    /// Lists every complete account.
    fn list_accounts(&self) -> RepoResult<Vec<Account>>;

    /// Returns the anonymous account, creating it on first use.
    ///
    /// Lookup, insert and re-fetch are separate round trips. A concurrent
    /// bootstrap that wins the insert surfaces here as `DuplicateEmail`,
    /// which is treated as "already exists" and followed by a re-fetch.
    fn fetch_or_create_anonymous(&self) -> RepoResult<Account> {
        if let Some(existing) = self.lookup_account(ANONYMOUS_EMAIL)? {
            return Ok(existing);
        }

        match self.add_account(&Account::anonymous()) {
            Ok(id) => info!("event=anonymous_account_created module=repo status=ok account_id={id}"),
            Err(RepoError::DuplicateEmail(_)) => {
                debug!("event=anonymous_account_created module=repo status=exists");
            }
            Err(err) => return Err(err),
        }

        self.lookup_account(ANONYMOUS_EMAIL)?
            .ok_or_else(|| RepoError::MissingAfterInsert("anonymous account".to_string()))
    }
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn add_account(&self, account: &Account) -> RepoResult<AccountId> {
        let inserted = self.conn.execute(
            "INSERT INTO account (email, api_code) VALUES (:email, :api_code);",
            named_params! {
                ":email": account.email.as_str(),
                ":api_code": account.api_code.as_str(),
            },
        );

        match inserted {
            Ok(_) => Ok(AccountId(self.conn.last_insert_rowid())),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateEmail(account.email.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_account(
        &self,
        account: &Account,
        new_email: &str,
        new_api_code: &str,
    ) -> RepoResult<()> {
        let updated = self.conn.execute(
            "UPDATE account SET email = :email, api_code = :api_code WHERE id = :id;",
            named_params! {
                ":email": new_email,
                ":api_code": new_api_code,
                ":id": account.id.0,
            },
        );

        match updated {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateEmail(new_email.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn lookup_account(&self, email: &str) -> RepoResult<Option<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, api_code
             FROM account
             WHERE email = :email
             ORDER BY id ASC;",
        )?;

        let mut rows = stmt.query(named_params! { ":email": email })?;
        while let Some(row) = rows.next()? {
            if let Some(account) = decode_account_row(row)?.into_row("account") {
                return Ok(Some(account));
            }
        }

        Ok(None)
    }

    fn list_accounts(&self) -> RepoResult<Vec<Account>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, email, api_code FROM account ORDER BY id ASC;")?;

        let mut rows = stmt.query([])?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next()? {
            if let Some(account) = decode_account_row(row)?.into_row("account") {
                accounts.push(account);
            }
        }

        Ok(accounts)
    }
}

fn decode_account_row(row: &Row<'_>) -> RepoResult<RowDecode<Account>> {
    let id: i64 = row.get("id").map_err(|err| decode_error("id", err))?;
    let Some(email) = optional_text(row, "email")? else {
        return Ok(RowDecode::Skip("missing email"));
    };
    let Some(api_code) = optional_text(row, "api_code")? else {
        return Ok(RowDecode::Skip("missing api_code"));
    };

    Ok(RowDecode::Row(Account {
        id: AccountId(id),
        email,
        api_code,
    }))
}
