use bigdecimal::BigDecimal;
use sqlx::{Executor, Postgres};

/// Per-(owner, token) accounted position in a bonding-curve market.
/// Identity key: `{owner}_{token_address}`. Created on first buy, updated on
/// buy/sell/claim, never deleted.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct SharesTokenUser {
    pub id: String,
    pub owner: String,
    pub token_address: String,
    pub amount_owned: BigDecimal,
    pub amount_buy: BigDecimal,
    pub amount_sell: BigDecimal,
    pub total_paid: BigDecimal,
    pub total_received: BigDecimal,
    pub amount_claimed: BigDecimal,
    pub is_claimable: bool,
}

impl SharesTokenUser {
    pub fn position_key(owner: &str, token_address: &str) -> String {
        format!("{owner}_{token_address}")
    }

    /// A fresh zeroed position for a first-time buyer
    pub fn empty(owner: &str, token_address: &str) -> Self {
        Self {
            id: Self::position_key(owner, token_address),
            owner: owner.to_string(),
            token_address: token_address.to_string(),
            amount_owned: BigDecimal::from(0),
            amount_buy: BigDecimal::from(0),
            amount_sell: BigDecimal::from(0),
            total_paid: BigDecimal::from(0),
            total_received: BigDecimal::from(0),
            amount_claimed: BigDecimal::from(0),
            is_claimable: false,
        }
    }

    /// Find a position by owner and token address
    pub async fn find<'c, E>(
        owner: &str,
        token_address: &str,
        connection: E,
    ) -> Result<Option<SharesTokenUser>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, SharesTokenUser>(
            "SELECT * FROM shares_token_user WHERE owner = $1 AND token_address = $2",
        )
        .bind(owner)
        .bind(token_address)
        .fetch_optional(connection)
        .await
    }

    /// Full-field replace-on-write upsert of a position computed from a
    /// freshly read prior state
    pub async fn upsert<'c, E>(position: &SharesTokenUser, connection: E) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO shares_token_user (
                id, owner, token_address, amount_owned, amount_buy,
                amount_sell, total_paid, total_received, amount_claimed,
                is_claimable
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                amount_owned = EXCLUDED.amount_owned,
                amount_buy = EXCLUDED.amount_buy,
                amount_sell = EXCLUDED.amount_sell,
                total_paid = EXCLUDED.total_paid,
                total_received = EXCLUDED.total_received,
                amount_claimed = EXCLUDED.amount_claimed,
                is_claimable = EXCLUDED.is_claimable
            "#,
        )
        .bind(&position.id)
        .bind(&position.owner)
        .bind(&position.token_address)
        .bind(&position.amount_owned)
        .bind(&position.amount_buy)
        .bind(&position.amount_sell)
        .bind(&position.total_paid)
        .bind(&position.total_received)
        .bind(&position.amount_claimed)
        .bind(position.is_claimable)
        .execute(connection)
        .await?;

        Ok(())
    }
}
