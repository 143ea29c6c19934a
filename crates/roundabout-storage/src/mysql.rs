pub mod migration;
pub mod records;

use async_trait::async_trait;
use roundabout_core::rank::repair_plan;
use roundabout_core::store::{Result, RingStore};
use roundabout_core::{Entry, EntryId, NewEntry, RecordId, ShortCode, StorageError};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

/// Connection settings for [`MySqlRingStore::connect_with`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlOptions {
    #[builder(setter(into))]
    url: String,
    #[builder(default = 5)]
    max_connections: u32,
    #[builder(default = Duration::from_secs(5))]
    acquire_timeout: Duration,
}

/// MySQL implementation of the ring store contract.
///
/// Every rank mutation runs in one transaction and locks the rows it reads
/// with `SELECT ... FOR UPDATE`, so concurrent requests never observe a
/// duplicated or missing rank. The store does not put a unique index on
/// `order_id`: a swap passes through a state where two rows share a rank
/// before its transaction commits.
#[derive(Debug, Clone)]
pub struct MySqlRingStore {
    pool: MySqlPool,
}

impl MySqlRingStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(&MySqlOptions::builder().url(database_url).build()).await
    }

    /// Creates a store by opening a pool with the given options.
    pub async fn connect_with(options: &MySqlOptions) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(&options.url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Creates missing tables and upgrades older schemas.
    pub async fn migrate(&self) -> Result<()> {
        migration::run(&self.pool).await
    }

    /// Drops every table owned by the ring.
    pub async fn uninstall(&self) -> Result<()> {
        for table in [
            "roundabout_redirects",
            "roundabout_records",
            "roundabout_meta",
        ] {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
            info!(table, "dropped table");
        }
        Ok(())
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn entry_from_row(row: &MySqlRow) -> Result<Entry> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let post_id: i64 = row.try_get("post_id").map_err(map_sqlx_error)?;
    let shortcode: String = row.try_get("shortcode").map_err(map_sqlx_error)?;
    let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;
    let order_id: i64 = row.try_get("order_id").map_err(map_sqlx_error)?;

    Ok(Entry {
        id: EntryId(id),
        record_id: RecordId(post_id),
        shortcode: ShortCode::new_unchecked(shortcode),
        target_url,
        order_id,
    })
}

fn entries_from_rows(rows: &[MySqlRow]) -> Result<Vec<Entry>> {
    rows.iter().map(entry_from_row).collect()
}

#[async_trait]
impl RingStore for MySqlRingStore {
    async fn list(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, post_id, shortcode, target_url, order_id
            FROM roundabout_redirects
            ORDER BY order_id ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        entries_from_rows(&rows)
    }

    async fn get(&self, id: EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, shortcode, target_url, order_id
            FROM roundabout_redirects
            WHERE id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn find_by_rank(&self, rank: i64) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, shortcode, target_url, order_id
            FROM roundabout_redirects
            WHERE order_id = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(rank)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn find_by_shortcode(&self, code: &ShortCode) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, shortcode, target_url, order_id
            FROM roundabout_redirects
            WHERE shortcode = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn find_by_record(&self, record_id: RecordId) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, shortcode, target_url, order_id
            FROM roundabout_redirects
            WHERE post_id = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(record_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roundabout_redirects")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn insert_last(&self, new: NewEntry) -> Result<Entry> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let max_rank: i64 = sqlx::query_scalar(
            "SELECT CAST(COALESCE(MAX(order_id), 0) AS SIGNED) FROM roundabout_redirects FOR UPDATE",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        let order_id = max_rank + 1;

        let result = sqlx::query(
            r#"
            INSERT INTO roundabout_redirects (post_id, shortcode, target_url, order_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new.record_id.0)
        .bind(new.shortcode.as_str())
        .bind(new.target_url.as_str())
        .bind(order_id)
        .execute(&mut *tx)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::Conflict(new.shortcode.to_string()))
            }
            Err(err) => return Err(map_sqlx_error(err)),
        };

        let id = i64::try_from(result.last_insert_id()).map_err(|e| {
            StorageError::InvalidData(format!("insert id out of range: {e}"))
        })?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Entry {
            id: EntryId(id),
            record_id: new.record_id,
            shortcode: new.shortcode,
            target_url: new.target_url,
            order_id,
        })
    }

    async fn remove(&self, id: EntryId) -> Result<Option<Entry>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query(
            r#"
            SELECT id, post_id, shortcode, target_url, order_id
            FROM roundabout_redirects
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let removed = entry_from_row(&row)?;

        sqlx::query("DELETE FROM roundabout_redirects WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let shifted = sqlx::query(
            r#"
            UPDATE roundabout_redirects
            SET order_id = order_id - 1
            WHERE order_id > ?
            "#,
        )
        .bind(removed.order_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            id = %id,
            order_id = removed.order_id,
            shifted = shifted.rows_affected(),
            "removed entry and closed rank gap"
        );
        Ok(Some(removed))
    }

    async fn swap_ranks(&self, a: EntryId, b: EntryId) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT id, CAST(order_id AS SIGNED)
            FROM roundabout_redirects
            WHERE id IN (?, ?)
            FOR UPDATE
            "#,
        )
        .bind(a.0)
        .bind(b.0)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let rank_of = |id: EntryId| {
            rows.iter()
                .find(|(row_id, _)| *row_id == id.0)
                .map(|(_, rank)| *rank)
        };
        let (Some(rank_a), Some(rank_b)) = (rank_of(a), rank_of(b)) else {
            return Ok(false);
        };

        for (id, rank) in [(a, rank_b), (b, rank_a)] {
            sqlx::query("UPDATE roundabout_redirects SET order_id = ? WHERE id = ?")
                .bind(rank)
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(a = %a, b = %b, rank_a, rank_b, "swapped ranks");
        Ok(true)
    }

    async fn repair_ranks(&self) -> Result<usize> {
        // Cheap unlocked check first; only a broken table pays for the lock.
        let (count, min_rank, max_rank, distinct): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   CAST(COALESCE(MIN(order_id), 0) AS SIGNED),
                   CAST(COALESCE(MAX(order_id), 0) AS SIGNED),
                   COUNT(DISTINCT order_id)
            FROM roundabout_redirects
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if count == 0 || (min_rank == 1 && max_rank == count && distinct == count) {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT id, CAST(order_id AS SIGNED)
            FROM roundabout_redirects
            ORDER BY order_id ASC, id ASC
            FOR UPDATE
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let ranks: Vec<(EntryId, i64)> = rows
            .into_iter()
            .map(|(id, rank)| (EntryId(id), rank))
            .collect();
        let plan = repair_plan(&ranks);

        for change in &plan {
            sqlx::query("UPDATE roundabout_redirects SET order_id = ? WHERE id = ?")
                .bind(change.to)
                .bind(change.id.0)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(plan.len())
    }

    async fn purge(&self) -> Result<Vec<Entry>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let rows = sqlx::query(
            r#"
            SELECT id, post_id, shortcode, target_url, order_id
            FROM roundabout_redirects
            ORDER BY order_id ASC, id ASC
            FOR UPDATE
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        let entries = entries_from_rows(&rows)?;

        sqlx::query("DELETE FROM roundabout_redirects")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(entries)
    }
}
