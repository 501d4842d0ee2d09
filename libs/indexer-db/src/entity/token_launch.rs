use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

use super::token_metadata::MetadataUpdate;

/// TokenLaunch entity representing the active bonding-curve market of a
/// token. Unique on `memecoin_address`, 1:1 with `token_deploy` once
/// launched.
///
/// Invariants enforced by the projection handlers (clamped on write):
/// `0 <= current_supply <= total_supply` and
/// `0 <= liquidity_raised <= threshold_liquidity`. `price` and `market_cap`
/// are recomputed from the other fields on every mutating event.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TokenLaunch {
    pub transaction_hash: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub memecoin_address: String,
    pub owner_address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub quote_token: Option<String>,
    pub total_supply: Option<BigDecimal>,
    pub threshold_liquidity: Option<BigDecimal>,
    pub current_supply: Option<BigDecimal>,
    pub liquidity_raised: Option<BigDecimal>,
    pub total_token_holded: Option<BigDecimal>,
    pub creator_fee_raised: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub market_cap: Option<BigDecimal>,
    pub bonding_type: Option<String>,
    pub is_liquidity_added: Option<bool>,
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

/// Input for creating a new token launch record
#[derive(Debug, Clone)]
pub struct NewTokenLaunch {
    pub transaction_hash: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub memecoin_address: String,
    pub owner_address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub quote_token: Option<String>,
    pub total_supply: Option<BigDecimal>,
    pub threshold_liquidity: Option<BigDecimal>,
    pub current_supply: Option<BigDecimal>,
    pub liquidity_raised: Option<BigDecimal>,
    pub total_token_holded: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub market_cap: Option<BigDecimal>,
    pub bonding_type: Option<String>,
}

/// Full-field replacement of the market state columns, computed by a
/// handler from a freshly read prior row. Never applied as an increment.
#[derive(Debug, Clone)]
pub struct MarketUpdate {
    pub current_supply: BigDecimal,
    pub liquidity_raised: BigDecimal,
    pub total_token_holded: BigDecimal,
    pub price: BigDecimal,
    pub market_cap: BigDecimal,
}

impl TokenLaunch {
    pub async fn create<'c, E>(launch: &NewTokenLaunch, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO token_launch (
                transaction_hash, network, block_timestamp, memecoin_address,
                owner_address, name, symbol, quote_token, total_supply,
                threshold_liquidity, current_supply, liquidity_raised,
                total_token_holded, creator_fee_raised, price, market_cap,
                bonding_type, is_liquidity_added, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0, $14, $15, $16, FALSE, NOW())
            "#,
        )
        .bind(&launch.transaction_hash)
        .bind(&launch.network)
        .bind(launch.block_timestamp)
        .bind(&launch.memecoin_address)
        .bind(&launch.owner_address)
        .bind(&launch.name)
        .bind(&launch.symbol)
        .bind(&launch.quote_token)
        .bind(&launch.total_supply)
        .bind(&launch.threshold_liquidity)
        .bind(&launch.current_supply)
        .bind(&launch.liquidity_raised)
        .bind(&launch.total_token_holded)
        .bind(&launch.price)
        .bind(&launch.market_cap)
        .bind(&launch.bonding_type)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Find launch by memecoin address
    pub async fn find_by_address<'c, E>(
        memecoin_address: &str,
        connection: E,
    ) -> Result<Option<TokenLaunch>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, TokenLaunch>("SELECT * FROM token_launch WHERE memecoin_address = $1")
            .bind(memecoin_address)
            .fetch_optional(connection)
            .await
    }

    /// Check for an existing launch by transaction hash OR memecoin address
    pub async fn exists<'c, E>(
        transaction_hash: &str,
        memecoin_address: &str,
        connection: E,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM token_launch WHERE transaction_hash = $1 OR memecoin_address = $2)",
        )
        .bind(transaction_hash)
        .bind(memecoin_address)
        .fetch_one(connection)
        .await
    }

    /// Replace the market state columns after a buy or sell
    pub async fn update_market_state<'c, E>(
        memecoin_address: &str,
        update: &MarketUpdate,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE token_launch SET
                current_supply = $2,
                liquidity_raised = $3,
                total_token_holded = $4,
                price = $5,
                market_cap = $6
            WHERE memecoin_address = $1
            "#,
        )
        .bind(memecoin_address)
        .bind(&update.current_supply)
        .bind(&update.liquidity_raised)
        .bind(&update.total_token_holded)
        .bind(&update.price)
        .bind(&update.market_cap)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Overwrite price and market cap with the final on-chain values once
    /// liquidity has been provisioned on a DEX
    pub async fn record_liquidity_outcome<'c, E>(
        memecoin_address: &str,
        price: &BigDecimal,
        market_cap: &BigDecimal,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE token_launch SET
                price = $2,
                market_cap = $3,
                is_liquidity_added = TRUE
            WHERE memecoin_address = $1
            "#,
        )
        .bind(memecoin_address)
        .bind(price)
        .bind(market_cap)
        .execute(connection)
        .await?;

        Ok(())
    }

    pub async fn set_liquidity_flag<'c, E>(
        memecoin_address: &str,
        is_liquidity_added: bool,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query("UPDATE token_launch SET is_liquidity_added = $2 WHERE memecoin_address = $1")
            .bind(memecoin_address)
            .bind(is_liquidity_added)
            .execute(connection)
            .await?;

        Ok(())
    }

    /// Upsert denormalized off-chain metadata fields onto the launch row
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
            UPDATE token_launch SET
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
