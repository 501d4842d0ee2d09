use sqlx::{types::chrono, Executor, Postgres};

/// Resume cursor: the ordering key of the last fully projected block.
/// On restart the host resumes the stream from `last_order_key + 1`.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct IndexerCursor {
    pub stream_key: String,
    pub last_order_key: i64,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl IndexerCursor {
    pub async fn find_or_create<'c, E>(
        stream_key: &str,
        connection: E,
    ) -> Result<IndexerCursor, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, IndexerCursor>(
            r#"
            INSERT INTO indexer_cursor (stream_key, last_order_key, updated_at)
            VALUES ($1, 0, NOW())
            ON CONFLICT (stream_key) DO UPDATE SET stream_key = EXCLUDED.stream_key
            RETURNING *
            "#,
        )
        .bind(stream_key)
        .fetch_one(connection)
        .await
    }

    /// Advance the cursor after a block has been fully projected
    pub async fn advance<'c, E>(
        stream_key: &str,
        order_key: i64,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE indexer_cursor SET
                last_order_key = GREATEST(last_order_key, $2),
                updated_at = NOW()
            WHERE stream_key = $1
            "#,
        )
        .bind(stream_key)
        .bind(order_key)
        .execute(connection)
        .await?;

        Ok(())
    }
}
