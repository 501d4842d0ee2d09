use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use indexer_db::{
    MarketUpdate, MetadataUpdate, NewTokenDeploy, NewTokenLaunch, NewTokenMetadata,
    NewTokenTransaction, SharesTokenUser, TokenDeploy, TokenLaunch, TokenMetadata,
    TokenTransaction,
};

use super::{Store, StoreError};

/// In-memory store used by the projection tests. Mirrors the uniqueness
/// rules of the Postgres schema: one deploy/launch/metadata row per token,
/// one ledger row per transfer id, one position per `{owner}_{token}`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    deploys: HashMap<String, TokenDeploy>,
    deploy_txs: Vec<String>,
    launches: HashMap<String, TokenLaunch>,
    launch_txs: Vec<String>,
    shares: HashMap<String, SharesTokenUser>,
    transactions: Vec<TokenTransaction>,
    metadata: HashMap<String, TokenMetadata>,
    metadata_txs: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ledger rows in insertion order.
    pub fn transactions(&self) -> Vec<TokenTransaction> {
        self.lock().transactions.clone()
    }

    pub fn deploy(&self, token: &str) -> Option<TokenDeploy> {
        self.lock().deploys.get(token).cloned()
    }

    pub fn launch(&self, token: &str) -> Option<TokenLaunch> {
        self.lock().launches.get(token).cloned()
    }

    pub fn shares(&self, owner: &str, token: &str) -> Option<SharesTokenUser> {
        self.lock()
            .shares
            .get(&SharesTokenUser::position_key(owner, token))
            .cloned()
    }

    pub fn metadata(&self, token: &str) -> Option<TokenMetadata> {
        self.lock().metadata.get(token).cloned()
    }
}

fn deploy_row(deploy: NewTokenDeploy) -> TokenDeploy {
    TokenDeploy {
        transaction_hash: deploy.transaction_hash,
        network: deploy.network,
        block_timestamp: deploy.block_timestamp,
        memecoin_address: deploy.memecoin_address,
        owner_address: deploy.owner_address,
        name: deploy.name,
        symbol: deploy.symbol,
        initial_supply: deploy.initial_supply,
        total_supply: deploy.total_supply,
        is_launched: Some(false),
        created_at: None,
        url: None,
        twitter: None,
        telegram: None,
        github: None,
        website: None,
        image_url: None,
        description: None,
        nostr_id: None,
    }
}

fn launch_row(launch: NewTokenLaunch) -> TokenLaunch {
    TokenLaunch {
        transaction_hash: launch.transaction_hash,
        network: launch.network,
        block_timestamp: launch.block_timestamp,
        memecoin_address: launch.memecoin_address,
        owner_address: launch.owner_address,
        name: launch.name,
        symbol: launch.symbol,
        quote_token: launch.quote_token,
        total_supply: launch.total_supply,
        threshold_liquidity: launch.threshold_liquidity,
        current_supply: launch.current_supply,
        liquidity_raised: launch.liquidity_raised,
        total_token_holded: launch.total_token_holded,
        creator_fee_raised: Some(BigDecimal::from(0)),
        price: launch.price,
        market_cap: launch.market_cap,
        bonding_type: launch.bonding_type,
        is_liquidity_added: Some(false),
        created_at: None,
        url: None,
        twitter: None,
        telegram: None,
        github: None,
        website: None,
        image_url: None,
        description: None,
        nostr_id: None,
    }
}

fn metadata_row(metadata: NewTokenMetadata) -> TokenMetadata {
    TokenMetadata {
        transaction_hash: metadata.transaction_hash,
        network: metadata.network,
        block_timestamp: metadata.block_timestamp,
        memecoin_address: metadata.memecoin_address,
        url: metadata.url,
        nostr_id: metadata.nostr_id,
        nostr_event_id: metadata.nostr_event_id,
        twitter: metadata.twitter,
        telegram: metadata.telegram,
        github: metadata.github,
        website: metadata.website,
        image_url: metadata.image_url,
        description: metadata.description,
        created_at: None,
    }
}

fn transaction_row(transaction: NewTokenTransaction) -> TokenTransaction {
    TokenTransaction {
        transfer_id: transaction.transfer_id,
        network: transaction.network,
        block_timestamp: transaction.block_timestamp,
        transaction_hash: transaction.transaction_hash,
        memecoin_address: transaction.memecoin_address,
        owner_address: transaction.owner_address,
        amount: transaction.amount,
        quote_amount: transaction.quote_amount,
        price: transaction.price,
        last_price: transaction.last_price,
        protocol_fee: transaction.protocol_fee,
        transaction_type: transaction.transaction_type,
        time_stamp: transaction.time_stamp,
        created_at: None,
    }
}

fn merge_metadata(update: &MetadataUpdate, target: MetadataTarget<'_>) {
    let apply = |next: &Option<String>, slot: &mut Option<String>| {
        if next.is_some() {
            *slot = next.clone();
        }
    };
    apply(&update.url, target.url);
    apply(&update.twitter, target.twitter);
    apply(&update.telegram, target.telegram);
    apply(&update.github, target.github);
    apply(&update.website, target.website);
    apply(&update.image_url, target.image_url);
    apply(&update.description, target.description);
    apply(&update.nostr_id, target.nostr_id);
}

struct MetadataTarget<'a> {
    url: &'a mut Option<String>,
    twitter: &'a mut Option<String>,
    telegram: &'a mut Option<String>,
    github: &'a mut Option<String>,
    website: &'a mut Option<String>,
    image_url: &'a mut Option<String>,
    description: &'a mut Option<String>,
    nostr_id: &'a mut Option<String>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_deploy(&self, token: &str) -> Result<Option<TokenDeploy>, StoreError> {
        Ok(self.lock().deploys.get(token).cloned())
    }

    async fn deploy_exists(
        &self,
        transaction_hash: &str,
        token: &str,
    ) -> Result<bool, StoreError> {
        let inner = self.lock();
        Ok(inner.deploys.contains_key(token)
            || inner.deploy_txs.iter().any(|tx| tx == transaction_hash))
    }

    async fn insert_deploy(&self, deploy: NewTokenDeploy) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.deploys.contains_key(&deploy.memecoin_address)
            || inner.deploy_txs.iter().any(|tx| *tx == deploy.transaction_hash)
        {
            return Err(StoreError::Duplicate);
        }
        inner.deploy_txs.push(deploy.transaction_hash.clone());
        inner
            .deploys
            .insert(deploy.memecoin_address.clone(), deploy_row(deploy));
        Ok(())
    }

    async fn mark_deploy_launched(&self, token: &str) -> Result<(), StoreError> {
        if let Some(deploy) = self.lock().deploys.get_mut(token) {
            deploy.is_launched = Some(true);
        }
        Ok(())
    }

    async fn find_launch(&self, token: &str) -> Result<Option<TokenLaunch>, StoreError> {
        Ok(self.lock().launches.get(token).cloned())
    }

    async fn launch_exists(
        &self,
        transaction_hash: &str,
        token: &str,
    ) -> Result<bool, StoreError> {
        let inner = self.lock();
        Ok(inner.launches.contains_key(token)
            || inner.launch_txs.iter().any(|tx| tx == transaction_hash))
    }

    async fn insert_launch(&self, launch: NewTokenLaunch) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.launches.contains_key(&launch.memecoin_address)
            || inner.launch_txs.iter().any(|tx| *tx == launch.transaction_hash)
        {
            return Err(StoreError::Duplicate);
        }
        inner.launch_txs.push(launch.transaction_hash.clone());
        inner
            .launches
            .insert(launch.memecoin_address.clone(), launch_row(launch));
        Ok(())
    }

    async fn update_launch_market(
        &self,
        token: &str,
        update: MarketUpdate,
    ) -> Result<(), StoreError> {
        if let Some(launch) = self.lock().launches.get_mut(token) {
            launch.current_supply = Some(update.current_supply);
            launch.liquidity_raised = Some(update.liquidity_raised);
            launch.total_token_holded = Some(update.total_token_holded);
            launch.price = Some(update.price);
            launch.market_cap = Some(update.market_cap);
        }
        Ok(())
    }

    async fn record_liquidity_outcome(
        &self,
        token: &str,
        price: BigDecimal,
        market_cap: BigDecimal,
    ) -> Result<(), StoreError> {
        if let Some(launch) = self.lock().launches.get_mut(token) {
            launch.price = Some(price);
            launch.market_cap = Some(market_cap);
            launch.is_liquidity_added = Some(true);
        }
        Ok(())
    }

    async fn set_liquidity_flag(
        &self,
        token: &str,
        is_liquidity_added: bool,
    ) -> Result<(), StoreError> {
        if let Some(launch) = self.lock().launches.get_mut(token) {
            launch.is_liquidity_added = Some(is_liquidity_added);
        }
        Ok(())
    }

    async fn find_shares(
        &self,
        owner: &str,
        token: &str,
    ) -> Result<Option<SharesTokenUser>, StoreError> {
        Ok(self
            .lock()
            .shares
            .get(&SharesTokenUser::position_key(owner, token))
            .cloned())
    }

    async fn upsert_shares(&self, position: SharesTokenUser) -> Result<(), StoreError> {
        self.lock().shares.insert(position.id.clone(), position);
        Ok(())
    }

    async fn transaction_exists(&self, transfer_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .transactions
            .iter()
            .any(|row| row.transfer_id == transfer_id))
    }

    async fn insert_transaction(
        &self,
        transaction: NewTokenTransaction,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner
            .transactions
            .iter()
            .any(|row| row.transfer_id == transaction.transfer_id)
        {
            return Err(StoreError::Duplicate);
        }
        inner.transactions.push(transaction_row(transaction));
        Ok(())
    }

    async fn metadata_exists(
        &self,
        transaction_hash: &str,
        token: &str,
    ) -> Result<bool, StoreError> {
        let inner = self.lock();
        Ok(inner.metadata.contains_key(token)
            || inner.metadata_txs.iter().any(|tx| tx == transaction_hash))
    }

    async fn insert_metadata(&self, metadata: NewTokenMetadata) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.metadata.contains_key(&metadata.memecoin_address)
            || inner
                .metadata_txs
                .iter()
                .any(|tx| *tx == metadata.transaction_hash)
        {
            return Err(StoreError::Duplicate);
        }
        inner.metadata_txs.push(metadata.transaction_hash.clone());
        inner
            .metadata
            .insert(metadata.memecoin_address.clone(), metadata_row(metadata));
        Ok(())
    }

    async fn apply_metadata(
        &self,
        token: &str,
        update: MetadataUpdate,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(deploy) = inner.deploys.get_mut(token) {
            merge_metadata(
                &update,
                MetadataTarget {
                    url: &mut deploy.url,
                    twitter: &mut deploy.twitter,
                    telegram: &mut deploy.telegram,
                    github: &mut deploy.github,
                    website: &mut deploy.website,
                    image_url: &mut deploy.image_url,
                    description: &mut deploy.description,
                    nostr_id: &mut deploy.nostr_id,
                },
            );
        }
        if let Some(launch) = inner.launches.get_mut(token) {
            merge_metadata(
                &update,
                MetadataTarget {
                    url: &mut launch.url,
                    twitter: &mut launch.twitter,
                    telegram: &mut launch.telegram,
                    github: &mut launch.github,
                    website: &mut launch.website,
                    image_url: &mut launch.image_url,
                    description: &mut launch.description,
                    nostr_id: &mut launch.nostr_id,
                },
            );
        }
        Ok(())
    }
}
