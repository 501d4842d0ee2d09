use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

use super::token_metadata::MetadataUpdate;

/// TokenDeploy entity representing a minted memecoin contract before its
/// bonding-curve launch. Unique on `memecoin_address`, never deleted.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TokenDeploy {
    pub transaction_hash: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub memecoin_address: String,
    pub owner_address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub initial_supply: Option<BigDecimal>,
    pub total_supply: Option<BigDecimal>,
    pub is_launched: Option<bool>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,

    // Denormalized off-chain metadata
    pub url: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub nostr_id: Option<String>,
}

/// Input for creating a new token deploy record
#[derive(Debug, Clone)]
pub struct NewTokenDeploy {
    pub transaction_hash: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub memecoin_address: String,
    pub owner_address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub initial_supply: Option<BigDecimal>,
    pub total_supply: Option<BigDecimal>,
}

impl TokenDeploy {
    /// Insert a deploy row. A duplicate memecoin address or transaction hash
    /// surfaces as a unique-constraint error for the caller to classify.
    pub async fn create<'c, E>(deploy: &NewTokenDeploy, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO token_deploy (
                transaction_hash, network, block_timestamp, memecoin_address,
                owner_address, name, symbol, initial_supply, total_supply,
                is_launched, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, NOW())
            "#,
        )
        .bind(&deploy.transaction_hash)
        .bind(&deploy.network)
        .bind(deploy.block_timestamp)
        .bind(&deploy.memecoin_address)
        .bind(&deploy.owner_address)
        .bind(&deploy.name)
        .bind(&deploy.symbol)
        .bind(&deploy.initial_supply)
        .bind(&deploy.total_supply)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Find deploy by memecoin address
    pub async fn find_by_address<'c, E>(
        memecoin_address: &str,
        connection: E,
    ) -> Result<Option<TokenDeploy>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, TokenDeploy>("SELECT * FROM token_deploy WHERE memecoin_address = $1")
            .bind(memecoin_address)
            .fetch_optional(connection)
            .await
    }

    /// Check for an existing deploy by transaction hash OR memecoin address
    pub async fn exists<'c, E>(
        transaction_hash: &str,
        memecoin_address: &str,
        connection: E,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM token_deploy WHERE transaction_hash = $1 OR memecoin_address = $2)",
        )
        .bind(transaction_hash)
        .bind(memecoin_address)
        .fetch_one(connection)
        .await
    }

    /// Flip the deploy to launched
    pub async fn mark_launched<'c, E>(
        memecoin_address: &str,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query("UPDATE token_deploy SET is_launched = TRUE WHERE memecoin_address = $1")
            .bind(memecoin_address)
            .execute(connection)
            .await?;

        Ok(())
    }

    /// Upsert denormalized off-chain metadata fields onto the deploy row
    pub async fn update_metadata<'c, E>(
        memecoin_address: &str,
        update: &MetadataUpdate,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE token_deploy SET
                url = COALESCE($2, url),
                twitter = COALESCE($3, twitter),
                telegram = COALESCE($4, telegram),
                github = COALESCE($5, github),
                website = COALESCE($6, website),
                image_url = COALESCE($7, image_url),
                description = COALESCE($8, description),
                nostr_id = COALESCE($9, nostr_id)
            WHERE memecoin_address = $1
            "#,
        )
        .bind(memecoin_address)
        .bind(&update.url)
        .bind(&update.twitter)
        .bind(&update.telegram)
        .bind(&update.github)
        .bind(&update.website)
        .bind(&update.image_url)
        .bind(&update.description)
        .bind(&update.nostr_id)
        .execute(connection)
        .await?;

        Ok(())
    }
}
