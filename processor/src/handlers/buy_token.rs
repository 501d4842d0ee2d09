use bigdecimal::{BigDecimal, Zero};
use indexer_db::{MarketUpdate, NewTokenTransaction, SharesTokenUser};
use tracing::{debug, info, warn};

use super::{num, EventMeta, HandlerContext, HandlerResult};
use crate::curve;
use crate::events::buy_token::BuyTokenEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &BuyTokenEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx.store.transaction_exists(&meta.transfer_id).await? {
        debug!(transfer_id = %meta.transfer_id, "buy already applied");
        return Ok(());
    }

    let Some(launch) = ctx.store.find_launch(&event.token_address).await? else {
        warn!(token = %event.token_address, "buy for unknown launch, skipping");
        return Ok(());
    };

    let zero = BigDecimal::zero();
    let total_supply = num(&launch.total_supply);
    let threshold = num(&launch.threshold_liquidity);
    let last_price = num(&launch.price);

    let mut new_supply = num(&launch.current_supply) - &event.amount;
    if new_supply < zero {
        warn!(
            token = %event.token_address,
            amount = %event.amount,
            "buy exceeds remaining curve supply, clamping"
        );
        new_supply = zero.clone();
    }

    let mut new_liquidity = num(&launch.liquidity_raised) + &event.quote_amount;
    if threshold > zero && new_liquidity > threshold {
        warn!(token = %event.token_address, "liquidity raised past threshold, clamping");
        new_liquidity = threshold.clone();
    }

    let new_total_holded = num(&launch.total_token_holded) + &event.amount;
    let price = curve::spot_price(&new_supply, &new_liquidity, &total_supply, &threshold);
    let market_cap = curve::market_cap(&total_supply, &price);

    ctx.store
        .update_launch_market(
            &event.token_address,
            MarketUpdate {
                current_supply: new_supply,
                liquidity_raised: new_liquidity,
                total_token_holded: new_total_holded.clone(),
                price: price.clone(),
                market_cap,
            },
        )
        .await?;

    let mut position = ctx
        .store
        .find_shares(&event.caller, &event.token_address)
        .await?
        .unwrap_or_else(|| SharesTokenUser::empty(&event.caller, &event.token_address));
    position.amount_owned += &event.amount;
    position.amount_buy += &event.amount;
    position.total_paid += &event.quote_amount;
    if position.amount_owned > new_total_holded {
        warn!(
            owner = %event.caller,
            token = %event.token_address,
            "position exceeds tokens held by users, clamping"
        );
        position.amount_owned = new_total_holded;
    }
    position.is_claimable = true;
    ctx.store.upsert_shares(position).await?;

    let ledger = NewTokenTransaction {
        transfer_id: meta.transfer_id.clone(),
        network: ctx.network.clone(),
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash.clone(),
        memecoin_address: event.token_address.clone(),
        owner_address: Some(event.caller.clone()),
        amount: Some(event.amount.clone()),
        quote_amount: Some(event.quote_amount.clone()),
        price: Some(price),
        last_price: Some(last_price),
        protocol_fee: Some(event.protocol_fee.clone()),
        transaction_type: "buy".to_string(),
        time_stamp: Some(meta.event_timestamp(event.timestamp)),
    };
    match ctx.store.insert_transaction(ledger).await {
        Ok(()) => {
            info!(token = %event.token_address, transfer_id = %meta.transfer_id, "buy projected")
        }
        Err(StoreError::Duplicate) => {
            debug!(transfer_id = %meta.transfer_id, "buy ledger row already present")
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
