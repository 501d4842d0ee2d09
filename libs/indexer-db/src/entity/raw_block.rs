use sqlx::{types::chrono, Executor, Postgres};

/// Ingestion queue row holding one raw block payload (JSON text) appended
/// by the stream transport. The processor drains rows in `order_key` order
/// and deletes them once the block has been projected.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RawBlock {
    pub id: i64,
    pub order_key: i64,
    pub payload: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl RawBlock {
    /// Fetch the next batch of pending blocks in stream order
    pub async fn find_batch<'c, E>(limit: i32, connection: E) -> Result<Vec<RawBlock>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, RawBlock>(
            "SELECT * FROM raw_blocks ORDER BY order_key ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(connection)
        .await
    }

    /// Remove a processed (or poison) block from the queue
    pub async fn delete<'c, E>(id: i64, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query("DELETE FROM raw_blocks WHERE id = $1")
            .bind(id)
            .execute(connection)
            .await?;

        Ok(())
    }
}
