//! Postgres-backed inventory store and user directory.
//!
//! ## Atomicity
//!
//! Ledger writes that move a part's quantity run in one transaction: the
//! quantity update and the entry insert commit together or not at all. The
//! stock-out guard is a conditional update (`quantity >= $n`), so the row
//! lock taken by Postgres serializes concurrent stock-outs on the same part
//! and the counter can never go below zero.
//!
//! ## Error Mapping
//!
//! | Condition | StoreError |
//! |-----------|------------|
//! | Part missing for a ledger write | `Domain(NotFound)` |
//! | Stock-out guard fails | `Domain(InsufficientStock)` |
//! | Unique violation on `users.username` | `Domain(Validation)` |
//! | Unknown category text in a row | `Corrupt` |
//! | Any other SQLx error | `Database` |

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use sims_auth::UserAccount;
use sims_core::{DomainError, PartId, StockInId, StockOutId, UserId};
use sims_inventory::{
    Category, DailyStockOutRow, NewPart, NewStockIn, NewStockOut, Part, StockInEntry,
    StockInRecord, StockOutEntry, StockOutRecord, StockStatusRow,
};

use super::{InventoryStore, UserDirectory};
use crate::error::StoreError;

/// Schema statements, applied in order by [`PostgresStore::ensure_schema`].
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS spare_part (
        spare_part_id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        quantity BIGINT NOT NULL CHECK (quantity >= 0),
        unit_price DOUBLE PRECISION NOT NULL,
        total_price DOUBLE PRECISION NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_in (
        stock_in_id BIGSERIAL PRIMARY KEY,
        spare_part_id BIGINT NOT NULL REFERENCES spare_part (spare_part_id),
        quantity BIGINT NOT NULL CHECK (quantity > 0),
        stock_in_date DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_out (
        stock_out_id BIGSERIAL PRIMARY KEY,
        spare_part_id BIGINT NOT NULL REFERENCES spare_part (spare_part_id),
        quantity BIGINT NOT NULL CHECK (quantity > 0),
        unit_price DOUBLE PRECISION NOT NULL,
        total_price DOUBLE PRECISION NOT NULL,
        stock_out_date DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS stock_out_date_idx ON stock_out (stock_out_date)",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
    "#,
];

const STOCK_OUT_COLUMNS: &str = "so.stock_out_id, so.spare_part_id, so.quantity, so.unit_price, \
     so.total_price, so.stock_out_date, so.created_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create missing tables. Existing tables are left untouched.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        Ok(self.pool.begin().await?)
    }
}

#[async_trait]
impl InventoryStore for PostgresStore {
    #[instrument(skip(self, part), fields(name = %part.name), err)]
    async fn insert_part(&self, part: NewPart, now: DateTime<Utc>) -> Result<Part, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO spare_part (name, category, quantity, unit_price, total_price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING spare_part_id
            "#,
        )
        .bind(&part.name)
        .bind(part.category.as_str())
        .bind(part.quantity)
        .bind(part.unit_price)
        .bind(part.total_price())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.try_get("spare_part_id")?;
        Ok(part.into_part(PartId::new(id), now))
    }

    async fn get_part(&self, id: PartId) -> Result<Option<Part>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT spare_part_id, name, category, quantity, unit_price, total_price, created_at
            FROM spare_part
            WHERE spare_part_id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(part_from_row).transpose()
    }

    async fn list_parts(&self) -> Result<Vec<Part>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT spare_part_id, name, category, quantity, unit_price, total_price, created_at
            FROM spare_part
            ORDER BY created_at DESC, spare_part_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(part_from_row).collect()
    }

    #[instrument(skip(self, entry), fields(part_id = %entry.part_id, quantity = entry.quantity), err)]
    async fn record_stock_in(&self, entry: NewStockIn, now: DateTime<Utc>) -> Result<StockInEntry, StoreError> {
        let mut tx = self.begin().await?;

        let updated = sqlx::query(
            "UPDATE spare_part SET quantity = quantity + $1 WHERE spare_part_id = $2 RETURNING quantity",
        )
        .bind(entry.quantity)
        .bind(entry.part_id.get())
        .fetch_optional(&mut *tx)
        .await;
        let updated = match updated {
            Err(e) if is_numeric_out_of_range(&e) => {
                tx.rollback().await?;
                return Err(DomainError::validation("Stock in quantity is too large").into());
            }
            other => other?,
        };
        if updated.is_none() {
            tx.rollback().await?;
            return Err(DomainError::not_found("Spare part").into());
        }

        let row = sqlx::query(
            r#"
            INSERT INTO stock_in (spare_part_id, quantity, stock_in_date, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING stock_in_id
            "#,
        )
        .bind(entry.part_id.get())
        .bind(entry.quantity)
        .bind(entry.date)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        let id: i64 = row.try_get("stock_in_id")?;

        tx.commit().await?;
        Ok(entry.into_entry(StockInId::new(id), now))
    }

    async fn list_stock_in(&self) -> Result<Vec<StockInRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT si.stock_in_id, si.spare_part_id, si.quantity, si.stock_in_date, si.created_at,
                   sp.name AS spare_part_name
            FROM stock_in si
            JOIN spare_part sp ON sp.spare_part_id = si.spare_part_id
            ORDER BY si.created_at DESC, si.stock_in_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<StockInRecord, StoreError> {
                Ok(StockInRecord {
                    entry: StockInEntry {
                        id: StockInId::new(row.try_get("stock_in_id")?),
                        part_id: PartId::new(row.try_get("spare_part_id")?),
                        quantity: row.try_get("quantity")?,
                        date: row.try_get("stock_in_date")?,
                        created_at: row.try_get("created_at")?,
                    },
                    part_name: row.try_get("spare_part_name")?,
                })
            })
            .collect()
    }

    #[instrument(skip(self, entry), fields(part_id = %entry.part_id, quantity = entry.quantity), err)]
    async fn record_stock_out(&self, entry: NewStockOut, now: DateTime<Utc>) -> Result<StockOutEntry, StoreError> {
        let mut tx = self.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE spare_part SET quantity = quantity - $1
            WHERE spare_part_id = $2 AND quantity >= $1
            RETURNING quantity
            "#,
        )
        .bind(entry.quantity)
        .bind(entry.part_id.get())
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            let current = sqlx::query("SELECT quantity FROM spare_part WHERE spare_part_id = $1")
                .bind(entry.part_id.get())
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;
            return Err(match current {
                None => DomainError::not_found("Spare part").into(),
                Some(row) => {
                    let available: i64 = row.try_get("quantity")?;
                    DomainError::insufficient_stock(entry.quantity, available).into()
                }
            });
        }

        let row = sqlx::query(
            r#"
            INSERT INTO stock_out (spare_part_id, quantity, unit_price, total_price, stock_out_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING stock_out_id
            "#,
        )
        .bind(entry.part_id.get())
        .bind(entry.quantity)
        .bind(entry.unit_price)
        .bind(entry.total_price())
        .bind(entry.date)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        let id: i64 = row.try_get("stock_out_id")?;

        tx.commit().await?;
        Ok(entry.into_entry(StockOutId::new(id), now))
    }

    #[instrument(skip(self, change), fields(stock_out_id = %id), err)]
    async fn update_stock_out(&self, id: StockOutId, change: NewStockOut) -> Result<StockOutEntry, StoreError> {
        let mut tx = self.begin().await?;

        let part = sqlx::query("SELECT 1 AS found FROM spare_part WHERE spare_part_id = $1")
            .bind(change.part_id.get())
            .fetch_optional(&mut *tx)
            .await?;
        if part.is_none() {
            tx.rollback().await?;
            return Err(DomainError::not_found("Spare part").into());
        }

        let row = sqlx::query(
            r#"
            UPDATE stock_out AS so
            SET spare_part_id = $1, quantity = $2, unit_price = $3, total_price = $4, stock_out_date = $5
            WHERE so.stock_out_id = $6
            RETURNING so.stock_out_id, so.spare_part_id, so.quantity, so.unit_price,
                      so.total_price, so.stock_out_date, so.created_at
            "#,
        )
        .bind(change.part_id.get())
        .bind(change.quantity)
        .bind(change.unit_price)
        .bind(change.total_price())
        .bind(change.date)
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(DomainError::not_found("Stock out record").into());
        };
        let entry = stock_out_from_row(&row)?;

        tx.commit().await?;
        Ok(entry)
    }

    #[instrument(skip(self), fields(stock_out_id = %id), err)]
    async fn delete_stock_out(&self, id: StockOutId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM stock_out WHERE stock_out_id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Stock out record").into());
        }
        Ok(())
    }

    async fn list_stock_out(&self) -> Result<Vec<StockOutRecord>, StoreError> {
        let sql = format!(
            r#"
            SELECT {STOCK_OUT_COLUMNS}, sp.name AS spare_part_name
            FROM stock_out so
            JOIN spare_part sp ON sp.spare_part_id = so.spare_part_id
            ORDER BY so.created_at DESC, so.stock_out_id DESC
            "#
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<StockOutRecord, StoreError> {
                Ok(StockOutRecord {
                    entry: stock_out_from_row(row)?,
                    part_name: row.try_get("spare_part_name")?,
                })
            })
            .collect()
    }

    async fn stock_out_on(&self, date: NaiveDate) -> Result<Vec<DailyStockOutRow>, StoreError> {
        let sql = format!(
            r#"
            SELECT {STOCK_OUT_COLUMNS}, sp.name AS spare_part_name, sp.category
            FROM stock_out so
            JOIN spare_part sp ON sp.spare_part_id = so.spare_part_id
            WHERE so.stock_out_date = $1
            ORDER BY so.created_at DESC, so.stock_out_id DESC
            "#
        );
        let rows = sqlx::query(&sql).bind(date).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<DailyStockOutRow, StoreError> {
                Ok(DailyStockOutRow {
                    entry: stock_out_from_row(row)?,
                    part_name: row.try_get("spare_part_name")?,
                    category: category_from_row(row)?,
                })
            })
            .collect()
    }

    async fn stock_status(&self) -> Result<Vec<StockStatusRow>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT sp.spare_part_id, sp.name, sp.category, sp.unit_price, sp.quantity,
                   COALESCE(SUM(so.quantity), 0)::BIGINT AS total_stock_out
            FROM spare_part sp
            LEFT JOIN stock_out so ON so.spare_part_id = sp.spare_part_id
            GROUP BY sp.spare_part_id, sp.name, sp.category, sp.unit_price, sp.quantity
            ORDER BY sp.name, sp.spare_part_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<StockStatusRow, StoreError> {
                Ok(StockStatusRow {
                    part_id: PartId::new(row.try_get("spare_part_id")?),
                    part_name: row.try_get("name")?,
                    category: category_from_row(row)?,
                    unit_price: row.try_get("unit_price")?,
                    quantity: row.try_get("quantity")?,
                    total_stock_out: row.try_get("total_stock_out")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl UserDirectory for PostgresStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query("SELECT user_id, username, password FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<UserAccount, StoreError> {
            Ok(UserAccount {
                id: UserId::new(row.try_get("user_id")?),
                username: row.try_get("username")?,
                password_hash: row.try_get("password")?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, password_hash), err)]
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<UserAccount, StoreError> {
        let row = sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2) RETURNING user_id")
            .bind(username)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::validation(format!("username {username:?} is taken")).into()
                } else {
                    StoreError::from(e)
                }
            })?;

        Ok(UserAccount {
            id: UserId::new(row.try_get("user_id")?),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }
}

fn part_from_row(row: &PgRow) -> Result<Part, StoreError> {
    Ok(Part {
        id: PartId::new(row.try_get("spare_part_id")?),
        name: row.try_get("name")?,
        category: category_from_row(row)?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        total_price: row.try_get("total_price")?,
        created_at: row.try_get("created_at")?,
    })
}

fn stock_out_from_row(row: &PgRow) -> Result<StockOutEntry, StoreError> {
    Ok(StockOutEntry {
        id: StockOutId::new(row.try_get("stock_out_id")?),
        part_id: PartId::new(row.try_get("spare_part_id")?),
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        total_price: row.try_get("total_price")?,
        date: row.try_get("stock_out_date")?,
        created_at: row.try_get("created_at")?,
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, StoreError> {
    let raw: String = row.try_get("category")?;
    raw.parse()
        .map_err(|_| StoreError::Corrupt(format!("unknown category {raw:?}")))
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "23505")
}

/// BIGINT arithmetic overflow.
fn is_numeric_out_of_range(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "22003")
}

fn has_sqlstate(err: &sqlx::Error, state: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == state),
        _ => false,
    }
}
