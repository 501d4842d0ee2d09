use indexer_db::NewTokenDeploy;
use tracing::{debug, info};

use super::{EventMeta, HandlerContext, HandlerResult};
use crate::events::create_token::CreateTokenEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &CreateTokenEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx
        .store
        .deploy_exists(&meta.transaction_hash, &event.token_address)
        .await?
    {
        debug!(token = %event.token_address, "token deploy already recorded");
        return Ok(());
    }

    let deploy = NewTokenDeploy {
        transaction_hash: meta.transaction_hash.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        memecoin_address: event.token_address.clone(),
        owner_address: event.caller.clone(),
        name: Some(event.name.clone()),
        symbol: Some(event.symbol.clone()),
        initial_supply: Some(event.initial_supply.clone()),
        total_supply: Some(event.total_supply.clone()),
    };

    match ctx.store.insert_deploy(deploy).await {
        Ok(()) => {
            info!(token = %event.token_address, name = %event.name, "token deploy recorded")
        }
        Err(StoreError::Duplicate) => {
            debug!(token = %event.token_address, "token deploy raced a replay")
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
