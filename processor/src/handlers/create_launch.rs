use bigdecimal::BigDecimal;
use indexer_db::NewTokenLaunch;
use tracing::{debug, info, warn};

use super::{EventMeta, HandlerContext, HandlerResult};
use crate::curve;
use crate::events::create_launch::CreateLaunchEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &CreateLaunchEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx
        .store
        .launch_exists(&meta.transaction_hash, &event.token_address)
        .await?
    {
        debug!(token = %event.token_address, "launch already recorded");
        return Ok(());
    }

    let Some(deploy) = ctx.store.find_deploy(&event.token_address).await? else {
        warn!(token = %event.token_address, "launch for unknown token deploy, skipping");
        return Ok(());
    };

    let market_cap = curve::market_cap(&event.total_supply, &event.price);
    let launch = NewTokenLaunch {
        transaction_hash: meta.transaction_hash.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        memecoin_address: event.token_address.clone(),
        owner_address: event.caller.clone(),
        name: deploy.name.clone(),
        symbol: deploy.symbol.clone(),
        quote_token: Some(event.quote_token.clone()),
        total_supply: Some(event.total_supply.clone()),
        threshold_liquidity: Some(event.threshold_liquidity.clone()),
        // trading starts with the whole supply on the curve
        current_supply: Some(event.total_supply.clone()),
        liquidity_raised: Some(BigDecimal::from(0)),
        total_token_holded: Some(BigDecimal::from(0)),
        price: Some(event.price.clone()),
        market_cap: Some(market_cap),
        bonding_type: event.bonding_type.clone(),
    };

    match ctx.store.insert_launch(launch).await {
        Ok(()) => info!(token = %event.token_address, "token launch recorded"),
        Err(StoreError::Duplicate) => {
            debug!(token = %event.token_address, "launch raced a replay");
            return Ok(());
        }
        Err(error) => return Err(error),
    }

    ctx.store.mark_deploy_launched(&event.token_address).await?;

    Ok(())
}
