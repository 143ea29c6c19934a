use super::map_sqlx_error;
use async_trait::async_trait;
use jiff::Timestamp;
use roundabout_core::content::{ContentRecord, ContentRecords};
use roundabout_core::{RecordId, StorageError};
use sqlx::{MySqlPool, Row};

/// Content records kept in the `roundabout_records` table.
#[derive(Debug, Clone)]
pub struct MySqlContentRecords {
    pool: MySqlPool,
}

impl MySqlContentRecords {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRecords for MySqlContentRecords {
    async fn create_record(&self, title: &str) -> Result<RecordId, StorageError> {
        let result = sqlx::query("INSERT INTO roundabout_records (title, created_at) VALUES (?, ?)")
            .bind(title)
            .bind(Timestamp::now().as_second())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        i64::try_from(result.last_insert_id())
            .map(RecordId)
            .map_err(|e| StorageError::InvalidData(format!("record id out of range: {e}")))
    }

    async fn delete_record(&self, id: RecordId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM roundabout_records WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StorageError> {
        let row = sqlx::query("SELECT id, title, created_at FROM roundabout_records WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let title: String = row.try_get("title").map_err(map_sqlx_error)?;
        let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
        let created_at = Timestamp::from_second(created_at).map_err(|e| {
            StorageError::InvalidData(format!("invalid created_at '{created_at}': {e}"))
        })?;

        Ok(Some(ContentRecord {
            id,
            title,
            created_at,
        }))
    }
}
