//! Scanned item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide add/delete/favorite APIs over the `product` table.
//! - Scope listings to one owning account.
//!
//! # Invariants
//! - Listings only return rows whose `account` matches the requested owner.
//! - Rows whose barcode is NULL or empty are skipped on read.
//! - `posted` is assigned by the store at insert time.
//! - Delete and favorite writes do not check ownership; callers enforce it.

use crate::model::account::{Account, AccountId};
use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::{decode_error, optional_text, RepoError, RepoResult, RowDecode};
use rusqlite::{named_params, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    barcode,
    product_desc,
    product_ind,
    datetime(posted, 'unixepoch') AS posted,
    is_favorite,
    account
FROM product";

/// Repository interface for scanned item operations.
pub trait ItemRepository {
    /// Inserts an item owned by `account` and returns its id.
    ///
    /// `account` must carry a store-assigned id.
    fn add_item(&self, item: &NewItem, account: &Account) -> RepoResult<ItemId>;
    /// Gets one item by id regardless of owner.
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Deletes by id. A missing id is not an error.
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    fn favorite_item(&self, id: ItemId) -> RepoResult<()>;
    fn unfavorite_item(&self, id: ItemId) -> RepoResult<()>;
    /// Lists every item owned by `account`, oldest first.
    fn list_items(&self, account: &Account) -> RepoResult<Vec<Item>>;
    /// Lists favorited items owned by `account`, oldest first.
    fn list_favorite_items(&self, account: &Account) -> RepoResult<Vec<Item>>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn set_favorite(&self, id: ItemId, favorite: bool) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE product SET is_favorite = :favorite WHERE id = :id;",
            named_params! {
                ":favorite": bool_to_int(favorite),
                ":id": id.0,
            },
        )?;
        Ok(())
    }

    fn query_items(&self, sql: &str, account: &Account) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(named_params! { ":account": account.id.0 })?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            if let Some(item) = decode_item_row(row)?.into_row("product") {
                items.push(item);
            }
        }
        Ok(items)
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn add_item(&self, item: &NewItem, account: &Account) -> RepoResult<ItemId> {
        if !account.is_persisted() {
            return Err(RepoError::UnpersistedAccount);
        }

        self.conn.execute(
            "INSERT INTO product (barcode, product_desc, product_ind, posted, account)
             VALUES (:barcode, :description, :index, strftime('%s', 'now'), :account);",
            named_params! {
                ":barcode": item.barcode.as_str(),
                ":description": item.description.as_deref(),
                ":index": item.index,
                ":account": account.id.0,
            },
        )?;

        Ok(ItemId(self.conn.last_insert_rowid()))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = :id;"))?;

        let mut rows = stmt.query(named_params! { ":id": id.0 })?;
        match rows.next()? {
            Some(row) => Ok(decode_item_row(row)?.into_row("product")),
            None => Ok(None),
        }
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM product WHERE id = :id;",
            named_params! { ":id": id.0 },
        )?;
        Ok(())
    }

    fn favorite_item(&self, id: ItemId) -> RepoResult<()> {
        self.set_favorite(id, true)
    }

    fn unfavorite_item(&self, id: ItemId) -> RepoResult<()> {
        self.set_favorite(id, false)
    }

    fn list_items(&self, account: &Account) -> RepoResult<Vec<Item>> {
        self.query_items(
            &format!("{ITEM_SELECT_SQL} WHERE account = :account ORDER BY id ASC;"),
            account,
        )
    }

    fn list_favorite_items(&self, account: &Account) -> RepoResult<Vec<Item>> {
        self.query_items(
            &format!(
                "{ITEM_SELECT_SQL} WHERE is_favorite = 1 AND account = :account ORDER BY id ASC;"
            ),
            account,
        )
    }
}

fn decode_item_row(row: &Row<'_>) -> RepoResult<RowDecode<Item>> {
    let barcode = optional_text(row, "barcode")?.filter(|value| !value.is_empty());
    let Some(barcode) = barcode else {
        return Ok(RowDecode::Skip("missing barcode"));
    };

    let get_i64 = |column: &str| -> RepoResult<i64> {
        row.get(column).map_err(|err| decode_error(column, err))
    };

    let is_favorite = match get_i64("is_favorite")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_favorite value `{other}` in product.is_favorite"
            )));
        }
    };

    Ok(RowDecode::Row(Item {
        id: ItemId(get_i64("id")?),
        barcode,
        description: row
            .get("product_desc")
            .map_err(|err| decode_error("product_desc", err))?,
        index: row
            .get("product_ind")
            .map_err(|err| decode_error("product_ind", err))?,
        since: row
            .get("posted")
            .map_err(|err| decode_error("posted", err))?,
        is_favorite,
        account_id: AccountId(get_i64("account")?),
    }))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
