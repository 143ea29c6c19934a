//! Versioned schema upgrades for the MySQL ring store.
//!
//! The schema version is kept in `roundabout_meta` under `schema_version`.
//! Releases before the marker existed left no version behind, so a missing
//! marker runs every step. Each step checks the live columns first, which
//! makes it a no-op on tables just created at the current version.

use super::map_sqlx_error;
use jiff::Timestamp;
use roundabout_core::store::Result;
use roundabout_core::StorageError;
use sqlx::MySqlPool;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};

const VERSION_KEY: &str = "schema_version";

/// A schema version of the redirect table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SchemaVersion(pub u32);

impl SchemaVersion {
    /// The first schema, which carried a `new_tab` flag per redirect.
    pub const INITIAL: Self = Self(1);
    /// `new_tab` removed.
    pub const WITHOUT_NEW_TAB: Self = Self(2);
    /// `order_id` rank added.
    pub const RANKED: Self = Self(3);
    pub const CURRENT: Self = Self::RANKED;
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SchemaVersion {
    type Err = StorageError;

    /// Parses a stored marker. Plain integers are schema versions; dotted
    /// markers are release numbers of the older plugin and map onto the
    /// schema they shipped with.
    fn from_str(marker: &str) -> std::result::Result<Self, Self::Err> {
        let marker = marker.trim();
        let invalid = || StorageError::InvalidData(format!("invalid schema version '{marker}'"));

        if !marker.contains('.') {
            return marker.parse::<u32>().map(Self).map_err(|_| invalid());
        }

        let mut parts = marker.split('.').map(|part| part.parse::<u32>());
        let mut next = || parts.next().unwrap_or(Ok(0)).map_err(|_| invalid());
        let release = (next()?, next()?, next()?);

        Ok(if release < (1, 0, 1) {
            Self::INITIAL
        } else if release < (1, 2, 0) {
            Self::WITHOUT_NEW_TAB
        } else {
            Self::RANKED
        })
    }
}

/// One upgrade step between schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    /// Drop the deprecated `new_tab` column.
    DropNewTab,
    /// Add `order_id` and backfill ranks `1..=N` in ascending `id` order.
    AddOrderId,
}

impl MigrationStep {
    /// Steps needed to bring a schema at `stored` up to
    /// [`SchemaVersion::CURRENT`]. A missing marker may belong to a table
    /// from any older release, so it gets every step. A marker newer than
    /// this build is refused.
    pub fn pending(stored: Option<SchemaVersion>) -> Result<Vec<MigrationStep>> {
        let stored = stored.unwrap_or(SchemaVersion::INITIAL);
        if stored > SchemaVersion::CURRENT {
            return Err(StorageError::InvalidData(format!(
                "schema version {stored} is newer than supported version {}",
                SchemaVersion::CURRENT
            )));
        }

        let mut steps = Vec::new();
        if stored < SchemaVersion::WITHOUT_NEW_TAB {
            steps.push(MigrationStep::DropNewTab);
        }
        if stored < SchemaVersion::RANKED {
            steps.push(MigrationStep::AddOrderId);
        }
        Ok(steps)
    }
}

/// Creates missing tables, applies pending steps and records the current version.
pub async fn run(pool: &MySqlPool) -> Result<()> {
    for ddl in [
        include_str!("../../ddl/mysql/redirects.sql"),
        include_str!("../../ddl/mysql/records.sql"),
        include_str!("../../ddl/mysql/meta.sql"),
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
    }

    let stored = stored_version(pool).await?;
    let steps = MigrationStep::pending(stored)?;
    info!(
        stored = ?stored,
        current = %SchemaVersion::CURRENT,
        steps = steps.len(),
        "checking schema version"
    );

    for step in steps {
        apply(pool, step).await?;
    }

    write_version(pool, SchemaVersion::CURRENT).await
}

async fn stored_version(pool: &MySqlPool) -> Result<Option<SchemaVersion>> {
    let value: Option<String> =
        sqlx::query_scalar("SELECT value FROM roundabout_meta WHERE name = ?")
            .bind(VERSION_KEY)
            .fetch_optional(pool)
            .await
            .map_err(map_sqlx_error)?;

    value.as_deref().map(SchemaVersion::from_str).transpose()
}

async fn write_version(pool: &MySqlPool, version: SchemaVersion) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO roundabout_meta (name, value, updated_at)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE value = VALUES(value), updated_at = VALUES(updated_at)
        "#,
    )
    .bind(VERSION_KEY)
    .bind(version.to_string())
    .bind(Timestamp::now().as_second())
    .execute(pool)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

async fn column_exists(pool: &MySqlPool, column: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_NAME = 'roundabout_redirects'
          AND COLUMN_NAME = ?
        "#,
    )
    .bind(column)
    .fetch_one(pool)
    .await
    .map_err(map_sqlx_error)?;

    Ok(count > 0)
}

async fn apply(pool: &MySqlPool, step: MigrationStep) -> Result<()> {
    match step {
        MigrationStep::DropNewTab => {
            if !column_exists(pool, "new_tab").await? {
                debug!("new_tab column already absent");
                return Ok(());
            }
            sqlx::query("ALTER TABLE roundabout_redirects DROP COLUMN new_tab")
                .execute(pool)
                .await
                .map_err(map_sqlx_error)?;
            info!("dropped new_tab column");
        }
        MigrationStep::AddOrderId => {
            if column_exists(pool, "order_id").await? {
                debug!("order_id column already present");
                return Ok(());
            }
            sqlx::query(
                "ALTER TABLE roundabout_redirects ADD COLUMN order_id INT NOT NULL DEFAULT 0",
            )
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;

            // DDL commits implicitly, so the backfill gets its own transaction.
            let mut tx = pool.begin().await.map_err(map_sqlx_error)?;
            let ids: Vec<i64> = sqlx::query_scalar(
                "SELECT id FROM roundabout_redirects ORDER BY id ASC FOR UPDATE",
            )
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            for (index, id) in ids.iter().enumerate() {
                sqlx::query("UPDATE roundabout_redirects SET order_id = ? WHERE id = ?")
                    .bind(index as i64 + 1)
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
            }
            tx.commit().await.map_err(map_sqlx_error)?;

            info!(backfilled = ids.len(), "added order_id column");
        }
    }

    Ok(())
}
