use indexer_db::{MetadataUpdate, NewTokenMetadata};
use tracing::{debug, info};

use super::{EventMeta, HandlerContext, HandlerResult};
use crate::events::metadata_coin_added::MetadataCoinAddedEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &MetadataCoinAddedEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx
        .store
        .metadata_exists(&meta.transaction_hash, &event.token_address)
        .await?
    {
        debug!(token = %event.token_address, "metadata already recorded");
        return Ok(());
    }

    // Preference order: direct ipfs url, gateway-resolved hash, plain url
    let mut sources = Vec::new();
    if !event.ipfs_url.is_empty() {
        sources.push(event.ipfs_url.clone());
    }
    if !event.ipfs_hash.is_empty() {
        sources.push(ctx.metadata.gateway_url(&event.ipfs_hash));
    }
    if !event.url.is_empty() {
        sources.push(event.url.clone());
    }
    let enrichment = ctx.metadata.resolve(&sources).await.unwrap_or_default();

    let row = NewTokenMetadata {
        transaction_hash: meta.transaction_hash.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        memecoin_address: event.token_address.clone(),
        url: none_if_empty(&event.url),
        nostr_id: enrichment.nostr_id.clone(),
        nostr_event_id: Some(event.nostr_event_id.clone()).filter(|id| id != "0"),
        twitter: enrichment.twitter.clone(),
        telegram: enrichment.telegram.clone(),
        github: enrichment.github.clone(),
        website: enrichment.website.clone(),
        image_url: enrichment.image_url.clone(),
        description: enrichment.description.clone(),
    };
    match ctx.store.insert_metadata(row).await {
        Ok(()) => info!(token = %event.token_address, "token metadata recorded"),
        Err(StoreError::Duplicate) => {
            debug!(token = %event.token_address, "metadata raced a replay");
            return Ok(());
        }
        Err(error) => return Err(error),
    }

    let update = MetadataUpdate {
        url: none_if_empty(&event.url),
        twitter: enrichment.twitter,
        telegram: enrichment.telegram,
        github: enrichment.github,
        website: enrichment.website,
        image_url: enrichment.image_url,
        description: enrichment.description,
        nostr_id: enrichment.nostr_id,
    };
    ctx.store
        .apply_metadata(&event.token_address, update)
        .await?;

    Ok(())
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
