use indexer_db::NewTokenTransaction;
use tracing::{debug, info};

use super::{EventMeta, HandlerContext, HandlerResult};
use crate::events::creator_fee_distributed::CreatorFeeDistributedEvent;
use crate::store::StoreError;

/// Fee payouts only append to the ledger; they do not move market state.
pub async fn handle(
    ctx: &HandlerContext,
    event: &CreatorFeeDistributedEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx.store.transaction_exists(&meta.transfer_id).await? {
        debug!(transfer_id = %meta.transfer_id, "fee distribution already applied");
        return Ok(());
    }

    let ledger = NewTokenTransaction {
        transfer_id: meta.transfer_id.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash.clone(),
        memecoin_address: event.memecoin_address.clone(),
        owner_address: Some(event.creator_fee_destination.clone()),
        amount: Some(event.amount.clone()),
        quote_amount: None,
        price: None,
        last_price: None,
        protocol_fee: None,
        transaction_type: "creator_fee_distributed".to_string(),
        time_stamp: Some(meta.block_timestamp),
    };
    match ctx.store.insert_transaction(ledger).await {
        Ok(()) => info!(
            token = %event.memecoin_address,
            destination = %event.creator_fee_destination,
            amount = %event.amount,
            "creator fee distribution recorded"
        ),
        Err(StoreError::Duplicate) => {
            debug!(transfer_id = %meta.transfer_id, "fee ledger row already present")
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
