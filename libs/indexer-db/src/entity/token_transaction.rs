use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// Append-only ledger row recording one economic event. `transfer_id`
/// (`{transaction_hash}_{event_index}`) is the idempotency key; a duplicate
/// insert fails the unique constraint and is treated as an expected replay.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TokenTransaction {
    pub transfer_id: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub transaction_hash: String,
    pub memecoin_address: String,
    pub owner_address: Option<String>,
    pub amount: Option<BigDecimal>,
    pub quote_amount: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub last_price: Option<BigDecimal>,
    pub protocol_fee: Option<BigDecimal>,
    pub transaction_type: String,
    pub time_stamp: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for appending a ledger row
#[derive(Debug, Clone)]
pub struct NewTokenTransaction {
    pub transfer_id: String,
    pub network: String,
    pub block_timestamp: chrono::DateTime<chrono::Utc>,
    pub transaction_hash: String,
    pub memecoin_address: String,
    pub owner_address: Option<String>,
    pub amount: Option<BigDecimal>,
    pub quote_amount: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub last_price: Option<BigDecimal>,
    pub protocol_fee: Option<BigDecimal>,
    pub transaction_type: String,
    pub time_stamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl TokenTransaction {
    pub async fn create<'c, E>(
        transaction: &NewTokenTransaction,
        connection: E,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO token_transactions (
                transfer_id, network, block_timestamp, transaction_hash,
                memecoin_address, owner_address, amount, quote_amount, price,
                last_price, protocol_fee, transaction_type, time_stamp,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
            "#,
        )
        .bind(&transaction.transfer_id)
        .bind(&transaction.network)
        .bind(transaction.block_timestamp)
        .bind(&transaction.transaction_hash)
        .bind(&transaction.memecoin_address)
        .bind(&transaction.owner_address)
        .bind(&transaction.amount)
        .bind(&transaction.quote_amount)
        .bind(&transaction.price)
        .bind(&transaction.last_price)
        .bind(&transaction.protocol_fee)
        .bind(&transaction.transaction_type)
        .bind(transaction.time_stamp)
        .execute(connection)
        .await?;

        Ok(())
    }

    /// Idempotency guard lookup by natural key
    pub async fn exists<'c, E>(transfer_id: &str, connection: E) -> Result<bool, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM token_transactions WHERE transfer_id = $1)",
        )
        .bind(transfer_id)
        .fetch_one(connection)
        .await
    }
}
