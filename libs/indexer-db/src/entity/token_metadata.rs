use sqlx::{types::chrono, Executor, Postgres};

/// Off-chain-enriched descriptive record keyed by memecoin address.
/// Created once per MetadataCoinAdded event; the same fields are also
/// denormalized onto `token_deploy` and `token_launch`.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TokenMetadata {
    pub transaction_hash: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub memecoin_address: String,
    pub url: Option<String>,
    pub nostr_id: Option<String>,
    pub nostr_event_id: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for creating a metadata record
#[derive(Debug, Clone)]
pub struct NewTokenMetadata {
    pub transaction_hash: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub memecoin_address: String,
    pub url: Option<String>,
    pub nostr_id: Option<String>,
    pub nostr_event_id: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Denormalized metadata fields applied to deploy and launch rows.
/// `None` fields leave the existing column value untouched.
#[derive(Debug, Clone, Default)]
pub struct MetadataUpdate {
    pub url: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub nostr_id: Option<String>,
}

impl TokenMetadata {
    pub async fn create<'c, E>(
        metadata: &NewTokenMetadata,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO token_metadata (
                transaction_hash, network, block_timestamp, memecoin_address,
                url, nostr_id, nostr_event_id, twitter, telegram, github,
                website, image_url, description, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
            "#,
        )
        .bind(&metadata.transaction_hash)
        .bind(&metadata.network)
        .bind(metadata.block_timestamp)
        .bind(&metadata.memecoin_address)
        .bind(&metadata.url)
        .bind(&metadata.nostr_id)
        .bind(&metadata.nostr_event_id)
        .bind(&metadata.twitter)
        .bind(&metadata.telegram)
        .bind(&metadata.github)
        .bind(&metadata.website)
        .bind(&metadata.image_url)
        .bind(&metadata.description)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Check for an existing record by transaction hash OR memecoin address
    pub async fn exists<'c, E>(
        transaction_hash: &str,
        memecoin_address: &str,
        connection: E,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM token_metadata WHERE transaction_hash = $1 OR memecoin_address = $2)",
        )
        .bind(transaction_hash)
        .bind(memecoin_address)
        .fetch_one(connection)
        .await
    }
}
