use bigdecimal::{BigDecimal, Zero};
use indexer_db::NewTokenTransaction;
use tracing::{debug, info, warn};

use super::{EventMeta, HandlerContext, HandlerResult};
use crate::events::token_claimed::TokenClaimedEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &TokenClaimedEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx.store.transaction_exists(&meta.transfer_id).await? {
        debug!(transfer_id = %meta.transfer_id, "claim already applied");
        return Ok(());
    }

    let Some(mut position) = ctx
        .store
        .find_shares(&event.owner, &event.token_address)
        .await?
    else {
        warn!(
            owner = %event.owner,
            token = %event.token_address,
            "claim from unknown shareholder, skipping"
        );
        return Ok(());
    };

    if event.amount > position.amount_owned {
        warn!(
            owner = %event.owner,
            token = %event.token_address,
            claimed = %event.amount,
            owned = %position.amount_owned,
            "claim exceeds owned shares, skipping"
        );
        return Ok(());
    }

    let zero = BigDecimal::zero();
    position.amount_owned -= &event.amount;
    position.amount_claimed += &event.amount;
    position.is_claimable = position.amount_owned > zero;
    ctx.store.upsert_shares(position).await?;

    let ledger = NewTokenTransaction {
        transfer_id: meta.transfer_id.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash.clone(),
        memecoin_address: event.token_address.clone(),
        owner_address: Some(event.owner.clone()),
        amount: Some(event.amount.clone()),
        quote_amount: None,
        price: None,
        last_price: None,
        protocol_fee: None,
        transaction_type: "claim".to_string(),
        time_stamp: Some(meta.event_timestamp(event.timestamp)),
    };
    match ctx.store.insert_transaction(ledger).await {
        Ok(()) => {
            info!(token = %event.token_address, owner = %event.owner, "claim projected")
        }
        Err(StoreError::Duplicate) => {
            debug!(transfer_id = %meta.transfer_id, "claim ledger row already present")
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
