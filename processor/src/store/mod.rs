//! Read/write seam between the projection handlers and the relational
//! store. All market and position updates are full-field replacements
//! computed by a handler from a freshly read prior state.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use indexer_db::{
    MarketUpdate, MetadataUpdate, NewTokenDeploy, NewTokenLaunch, NewTokenMetadata,
    NewTokenTransaction, SharesTokenUser, TokenDeploy, TokenLaunch,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique-constraint hit: the row already exists. Expected under
    /// at-least-once delivery and treated as a no-op by handlers.
    #[error("row already exists")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_deploy(&self, token: &str) -> Result<Option<TokenDeploy>, StoreError>;
    async fn deploy_exists(&self, transaction_hash: &str, token: &str)
        -> Result<bool, StoreError>;
    async fn insert_deploy(&self, deploy: NewTokenDeploy) -> Result<(), StoreError>;
    async fn mark_deploy_launched(&self, token: &str) -> Result<(), StoreError>;

    async fn find_launch(&self, token: &str) -> Result<Option<TokenLaunch>, StoreError>;
    async fn launch_exists(&self, transaction_hash: &str, token: &str)
        -> Result<bool, StoreError>;
    async fn insert_launch(&self, launch: NewTokenLaunch) -> Result<(), StoreError>;
    async fn update_launch_market(
        &self,
        token: &str,
        update: MarketUpdate,
    ) -> Result<(), StoreError>;
    async fn record_liquidity_outcome(
        &self,
        token: &str,
        price: BigDecimal,
        market_cap: BigDecimal,
    ) -> Result<(), StoreError>;
    async fn set_liquidity_flag(&self, token: &str, is_liquidity_added: bool)
        -> Result<(), StoreError>;

    async fn find_shares(
        &self,
        owner: &str,
        token: &str,
    ) -> Result<Option<SharesTokenUser>, StoreError>;
    async fn upsert_shares(&self, position: SharesTokenUser) -> Result<(), StoreError>;

    async fn transaction_exists(&self, transfer_id: &str) -> Result<bool, StoreError>;
    async fn insert_transaction(&self, transaction: NewTokenTransaction)
        -> Result<(), StoreError>;

    async fn metadata_exists(&self, transaction_hash: &str, token: &str)
        -> Result<bool, StoreError>;
    async fn insert_metadata(&self, metadata: NewTokenMetadata) -> Result<(), StoreError>;
    /// Denormalize resolved metadata onto the deploy and launch rows.
    async fn apply_metadata(&self, token: &str, update: MetadataUpdate)
        -> Result<(), StoreError>;
}
