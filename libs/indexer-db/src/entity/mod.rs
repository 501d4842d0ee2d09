// Launchpad projection entities
pub mod shares_token_user;
pub mod token_deploy;
pub mod token_launch;
pub mod token_metadata;
pub mod token_transaction;

// Stream ingestion queue and resume cursor
pub mod indexer_cursor;
pub mod raw_block;

// Re-exports for convenience
pub use indexer_cursor::IndexerCursor;
pub use raw_block::RawBlock;
pub use shares_token_user::SharesTokenUser;
pub use token_deploy::{NewTokenDeploy, TokenDeploy};
pub use token_launch::{MarketUpdate, NewTokenLaunch, TokenLaunch};
pub use token_metadata::{MetadataUpdate, NewTokenMetadata, TokenMetadata};
pub use token_transaction::{NewTokenTransaction, TokenTransaction};
