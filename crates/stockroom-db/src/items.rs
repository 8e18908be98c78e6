//! Item repository implementation.
//!
//! Every mutating call runs in one transaction whose first statement is a
//! write. SQLite takes the write lock at that statement, so the duplicate
//! lookups that follow see a stable table and concurrent writers queue on
//! `busy_timeout` instead of racing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqliteConnection};
use tracing::{debug, info};

use stockroom_core::{
    check_amount, name_key, require_name, Category, CreateItemRequest, CreateOutcome, Error, Item,
    ItemRepository, ListItemsRequest, Result, Stock, UpdateItemRequest,
};

const ITEM_COLUMNS: &str = "id, category, name, weight, length, quantity, created_at, updated_at";

/// SQLite implementation of ItemRepository.
#[derive(Clone)]
pub struct SqliteItemRepository {
    pool: Pool<Sqlite>,
}

impl SqliteItemRepository {
    /// Create a new SqliteItemRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Check if an item exists.
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM item WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(found != 0)
    }
}

/// Label used in amount errors for a create call, matching what the client
/// calls the field.
fn amount_field(category: Category) -> &'static str {
    if category.is_raw() {
        "Amount"
    } else {
        "Quantity"
    }
}

fn item_from_row(row: &SqliteRow) -> Result<Item> {
    let category: String = row.try_get("category")?;
    Ok(Item {
        id: row.try_get("id")?,
        category: category.parse()?,
        name: row.try_get("name")?,
        weight: row.try_get("weight")?,
        length: row.try_get("length")?,
        quantity: row.try_get("quantity")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Refresh `updated_at` and return the current row. Taking the write lock
/// here is what makes the rest of the transaction race-free.
async fn touch(conn: &mut SqliteConnection, id: i64, now: DateTime<Utc>) -> Result<Option<Item>> {
    let row = sqlx::query(&format!(
        "UPDATE item SET updated_at = ? WHERE id = ? RETURNING {ITEM_COLUMNS}"
    ))
    .bind(now)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Database)?;
    row.as_ref().map(item_from_row).transpose()
}

/// Find an item in `category` whose name key equals `key`, optionally
/// ignoring one id.
async fn find_by_key(
    conn: &mut SqliteConnection,
    category: Category,
    key: &str,
    exclude_id: Option<i64>,
) -> Result<Option<Item>> {
    let row = sqlx::query(&format!(
        "SELECT {ITEM_COLUMNS} FROM item \
         WHERE category = ? AND name_key = ? AND (? IS NULL OR id <> ?)"
    ))
    .bind(category.as_str())
    .bind(key)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Database)?;
    row.as_ref().map(item_from_row).transpose()
}

async fn write_stock(
    conn: &mut SqliteConnection,
    id: i64,
    stock: Stock,
    now: DateTime<Utc>,
) -> Result<Item> {
    let row = sqlx::query(&format!(
        "UPDATE item SET weight = ?, length = ?, quantity = ?, updated_at = ? \
         WHERE id = ? RETURNING {ITEM_COLUMNS}"
    ))
    .bind(stock.weight)
    .bind(stock.length)
    .bind(stock.quantity)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Database)?;
    item_from_row(&row)
}

/// Validated form of an [`UpdateItemRequest`].
struct ValidatedUpdate {
    name: Option<String>,
    weight: Option<f64>,
    length: Option<f64>,
    quantity: Option<f64>,
}

impl ValidatedUpdate {
    fn new(req: UpdateItemRequest) -> Result<Self> {
        Ok(Self {
            // A blank name means "keep the current one".
            name: req
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            weight: req.weight.map(|v| check_amount(v, "Weight")).transpose()?,
            length: req.length.map(|v| check_amount(v, "Length")).transpose()?,
            quantity: req
                .quantity
                .map(|v| check_amount(v, "Quantity"))
                .transpose()?,
        })
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn list(&self, req: ListItemsRequest) -> Result<Vec<Item>> {
        // Lower-cased, not trimmed; spaces in the term are significant.
        let needle = req
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);

        let mut sql = format!("SELECT {ITEM_COLUMNS} FROM item WHERE category = ?");
        if needle.is_some() {
            sql.push_str(" AND instr(name_key, ?) > 0");
        }
        if req.available_only {
            sql.push_str(if req.category.is_raw() {
                " AND (weight > 0 OR length > 0)"
            } else {
                " AND quantity > 0"
            });
        }
        sql.push_str(" ORDER BY name_key ASC, id ASC");

        let mut query = sqlx::query(&sql).bind(req.category.as_str());
        if let Some(needle) = &needle {
            query = query.bind(needle);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let items = rows.iter().map(item_from_row).collect::<Result<Vec<_>>>()?;
        debug!(
            subsystem = "database",
            component = "items",
            op = "list",
            category = %req.category,
            search = needle.as_deref().unwrap_or(""),
            available_only = req.available_only,
            result_count = items.len(),
            "Listed items"
        );
        Ok(items)
    }

    async fn fetch(&self, id: i64) -> Result<Item> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM item WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NotFound(id))?;
        item_from_row(&row)
    }

    async fn create_or_merge(&self, req: CreateItemRequest) -> Result<CreateOutcome> {
        let name = require_name(&req.name)?;
        let amount = check_amount(req.amount, amount_field(req.category))?;
        let key = name_key(&name);
        let incoming = Stock::single(req.category, req.mode, amount);
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Insert first: either the row is new, or the unique index tells us
        // a same-named item exists while we already hold the write lock.
        let inserted = sqlx::query(&format!(
            "INSERT INTO item (category, name, name_key, weight, length, quantity, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (category, name_key) DO NOTHING \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(req.category.as_str())
        .bind(&name)
        .bind(&key)
        .bind(incoming.weight)
        .bind(incoming.length)
        .bind(incoming.quantity)
        .bind(now)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if let Some(row) = inserted {
            let item = item_from_row(&row)?;
            tx.commit().await.map_err(Error::Database)?;
            info!(
                subsystem = "database",
                component = "items",
                op = "create",
                item_id = item.id,
                category = %item.category,
                "Item created"
            );
            return Ok(CreateOutcome::Created(item));
        }

        let existing = find_by_key(&mut *tx, req.category, &key, None)
            .await?
            .ok_or(Error::Database(sqlx::Error::RowNotFound))?;

        if !req.force {
            debug!(
                subsystem = "database",
                component = "items",
                op = "create",
                item_id = existing.id,
                "Duplicate name, merge not requested"
            );
            return Err(Error::DuplicateExists(Box::new(existing)));
        }

        let stock = existing
            .stock()
            .merged(incoming)
            .checked(amount_field(req.category))?;
        let merged = write_stock(&mut *tx, existing.id, stock, now).await?;
        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "database",
            component = "items",
            op = "merge",
            item_id = merged.id,
            category = %merged.category,
            "Amount merged into existing item"
        );
        Ok(CreateOutcome::Merged(merged))
    }

    async fn update(&self, id: i64, req: UpdateItemRequest) -> Result<Item> {
        let update = match ValidatedUpdate::new(req) {
            Ok(update) => update,
            Err(e) => {
                // A missing item outranks bad input.
                if !self.exists(id).await? {
                    return Err(Error::NotFound(id));
                }
                return Err(e);
            }
        };
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let current = touch(&mut *tx, id, now).await?.ok_or(Error::NotFound(id))?;

        let name = update.name.unwrap_or_else(|| current.name.clone());
        let key = name_key(&name);
        if let Some(duplicate) = find_by_key(&mut *tx, current.category, &key, Some(id)).await? {
            return Err(Error::DuplicateExists(Box::new(duplicate)));
        }

        let row = sqlx::query(&format!(
            "UPDATE item SET name = ?, name_key = ?, weight = ?, length = ?, quantity = ?, updated_at = ? \
             WHERE id = ? RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&name)
        .bind(&key)
        .bind(update.weight.unwrap_or(current.weight))
        .bind(update.length.unwrap_or(current.length))
        .bind(update.quantity.unwrap_or(current.quantity))
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;
        let item = item_from_row(&row)?;
        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "items",
            op = "update",
            item_id = id,
            "Item updated"
        );
        Ok(item)
    }

    async fn zero_out(&self, id: i64) -> Result<Item> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let current = touch(&mut *tx, id, now).await?.ok_or(Error::NotFound(id))?;

        let item = write_stock(&mut *tx, id, current.stock().zeroed(current.category), now).await?;
        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "items",
            op = "zero_out",
            item_id = id,
            category = %item.category,
            "Item stock cleared"
        );
        Ok(item)
    }

    async fn delete(&self, id: i64) -> Result<i64> {
        let deleted: Option<i64> = sqlx::query_scalar("DELETE FROM item WHERE id = ? RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        let deleted = deleted.ok_or(Error::NotFound(id))?;

        info!(
            subsystem = "database",
            component = "items",
            op = "delete",
            item_id = deleted,
            "Item deleted"
        );
        Ok(deleted)
    }
}
