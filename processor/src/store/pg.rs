use async_trait::async_trait;
use bigdecimal::BigDecimal;
use indexer_db::{
    MarketUpdate, MetadataUpdate, NewTokenDeploy, NewTokenLaunch, NewTokenMetadata,
    NewTokenTransaction, SharesTokenUser, TokenDeploy, TokenLaunch, TokenMetadata,
    TokenTransaction,
};
use sqlx::{Pool, Postgres};

use super::{Store, StoreError};

/// Postgres-backed store, a thin shim over the entity layer that maps
/// unique-constraint violations to [`StoreError::Duplicate`].
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn classify(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_error) = error {
        if db_error.is_unique_violation() {
            return StoreError::Duplicate;
        }
    }
    StoreError::Database(error)
}

#[async_trait]
impl Store for PgStore {
    async fn find_deploy(&self, token: &str) -> Result<Option<TokenDeploy>, StoreError> {
        Ok(TokenDeploy::find_by_address(token, &self.pool).await?)
    }

    async fn deploy_exists(
        &self,
        transaction_hash: &str,
        token: &str,
    ) -> Result<bool, StoreError> {
        Ok(TokenDeploy::exists(transaction_hash, token, &self.pool).await?)
    }

    async fn insert_deploy(&self, deploy: NewTokenDeploy) -> Result<(), StoreError> {
        TokenDeploy::create(&deploy, &self.pool)
            .await
            .map_err(classify)
    }

    async fn mark_deploy_launched(&self, token: &str) -> Result<(), StoreError> {
        Ok(TokenDeploy::mark_launched(token, &self.pool).await?)
    }

    async fn find_launch(&self, token: &str) -> Result<Option<TokenLaunch>, StoreError> {
        Ok(TokenLaunch::find_by_address(token, &self.pool).await?)
    }

    async fn launch_exists(
        &self,
        transaction_hash: &str,
        token: &str,
    ) -> Result<bool, StoreError> {
        Ok(TokenLaunch::exists(transaction_hash, token, &self.pool).await?)
    }

    async fn insert_launch(&self, launch: NewTokenLaunch) -> Result<(), StoreError> {
        TokenLaunch::create(&launch, &self.pool)
            .await
            .map_err(classify)
    }

    async fn update_launch_market(
        &self,
        token: &str,
        update: MarketUpdate,
    ) -> Result<(), StoreError> {
        Ok(TokenLaunch::update_market_state(token, &update, &self.pool).await?)
    }

    async fn record_liquidity_outcome(
        &self,
        token: &str,
        price: BigDecimal,
        market_cap: BigDecimal,
    ) -> Result<(), StoreError> {
        Ok(TokenLaunch::record_liquidity_outcome(token, &price, &market_cap, &self.pool).await?)
    }

    async fn set_liquidity_flag(
        &self,
        token: &str,
        is_liquidity_added: bool,
    ) -> Result<(), StoreError> {
        Ok(TokenLaunch::set_liquidity_flag(token, is_liquidity_added, &self.pool).await?)
    }

    async fn find_shares(
        &self,
        owner: &str,
        token: &str,
    ) -> Result<Option<SharesTokenUser>, StoreError> {
        Ok(SharesTokenUser::find(owner, token, &self.pool).await?)
    }

    async fn upsert_shares(&self, position: SharesTokenUser) -> Result<(), StoreError> {
        Ok(SharesTokenUser::upsert(&position, &self.pool).await?)
    }

    async fn transaction_exists(&self, transfer_id: &str) -> Result<bool, StoreError> {
        Ok(TokenTransaction::exists(transfer_id, &self.pool).await?)
    }

    async fn insert_transaction(
        &self,
        transaction: NewTokenTransaction,
    ) -> Result<(), StoreError> {
        TokenTransaction::create(&transaction, &self.pool)
            .await
            .map_err(classify)
    }

    async fn metadata_exists(
        &self,
        transaction_hash: &str,
        token: &str,
    ) -> Result<bool, StoreError> {
        Ok(TokenMetadata::exists(transaction_hash, token, &self.pool).await?)
    }

    async fn insert_metadata(&self, metadata: NewTokenMetadata) -> Result<(), StoreError> {
        TokenMetadata::create(&metadata, &self.pool)
            .await
            .map_err(classify)
    }

    async fn apply_metadata(
        &self,
        token: &str,
        update: MetadataUpdate,
    ) -> Result<(), StoreError> {
        TokenDeploy::update_metadata(token, &update, &self.pool).await?;
        TokenLaunch::update_metadata(token, &update, &self.pool).await?;
        Ok(())
    }
}
