use indexer_db::NewTokenTransaction;
use tracing::{debug, info, warn};

use super::{EventMeta, HandlerContext, HandlerResult};
use crate::events::liquidity_can_be_added::LiquidityCanBeAddedEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &LiquidityCanBeAddedEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx.store.transaction_exists(&meta.transfer_id).await? {
        debug!(transfer_id = %meta.transfer_id, "threshold crossing already applied");
        return Ok(());
    }

    if ctx.store.find_launch(&event.asset).await?.is_some() {
        // liquidity is addable but not yet added
        ctx.store.set_liquidity_flag(&event.asset, false).await?;
        info!(token = %event.asset, pool = %event.pool, "curve reached its liquidity threshold");
    } else {
        warn!(token = %event.asset, "threshold crossing for unknown launch");
    }

    let ledger = NewTokenTransaction {
        transfer_id: meta.transfer_id.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash.clone(),
        memecoin_address: event.asset.clone(),
        owner_address: None,
        amount: None,
        quote_amount: None,
        price: None,
        last_price: None,
        protocol_fee: None,
        transaction_type: "liquidity_can_be_added".to_string(),
        time_stamp: Some(meta.block_timestamp),
    };
    match ctx.store.insert_transaction(ledger).await {
        Ok(()) => {}
        Err(StoreError::Duplicate) => {
            debug!(transfer_id = %meta.transfer_id, "threshold ledger row already present")
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
