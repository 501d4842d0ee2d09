use indexer_db::NewTokenTransaction;
use tracing::{debug, info, warn};

use super::{EventMeta, HandlerContext, HandlerResult};
use crate::events::liquidity_created::LiquidityCreatedEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &LiquidityCreatedEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx.store.transaction_exists(&meta.transfer_id).await? {
        debug!(transfer_id = %meta.transfer_id, "liquidity creation already applied");
        return Ok(());
    }

    if ctx.store.find_launch(&event.asset).await?.is_some() {
        ctx.store
            .record_liquidity_outcome(
                &event.asset,
                event.final_price.clone(),
                event.final_market_cap.clone(),
            )
            .await?;
        info!(
            token = %event.asset,
            pool = %event.pool,
            exchange = event.exchange.as_deref().unwrap_or("unknown"),
            "launch graduated to AMM liquidity"
        );
    } else {
        warn!(token = %event.asset, "liquidity created for unknown launch");
    }

    let ledger = NewTokenTransaction {
        transfer_id: meta.transfer_id.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash.clone(),
        memecoin_address: event.asset.clone(),
        owner_address: Some(event.owner.clone()),
        amount: None,
        quote_amount: None,
        price: Some(event.final_price.clone()),
        last_price: None,
        protocol_fee: None,
        transaction_type: "liquidity_created".to_string(),
        time_stamp: Some(meta.block_timestamp),
    };
    match ctx.store.insert_transaction(ledger).await {
        Ok(()) => {}
        Err(StoreError::Duplicate) => {
            debug!(transfer_id = %meta.transfer_id, "liquidity ledger row already present")
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
