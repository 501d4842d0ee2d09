use bigdecimal::{BigDecimal, Zero};
use indexer_db::{MarketUpdate, NewTokenTransaction};
use tracing::{debug, info, warn};

use super::{num, EventMeta, HandlerContext, HandlerResult};
use crate::curve;
use crate::events::sell_token::SellTokenEvent;
use crate::store::StoreError;

pub async fn handle(
    ctx: &HandlerContext,
    event: &SellTokenEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    if ctx.store.transaction_exists(&meta.transfer_id).await? {
        debug!(transfer_id = %meta.transfer_id, "sell already applied");
        return Ok(());
    }

    let Some(launch) = ctx.store.find_launch(&event.token_address).await? else {
        warn!(token = %event.token_address, "sell for unknown launch, skipping");
        return Ok(());
    };

    let zero = BigDecimal::zero();
    let total_supply = num(&launch.total_supply);
    let threshold = num(&launch.threshold_liquidity);
    let last_price = num(&launch.price);

    let mut new_supply = num(&launch.current_supply) + &event.amount;
    if total_supply > zero && new_supply > total_supply {
        warn!(
            token = %event.token_address,
            amount = %event.amount,
            "sell returns more than total supply, clamping"
        );
        new_supply = total_supply.clone();
    }

    let mut new_liquidity = num(&launch.liquidity_raised) - &event.quote_amount;
    if new_liquidity < zero {
        warn!(token = %event.token_address, "sell drains more than liquidity raised, clamping");
        new_liquidity = zero.clone();
    }

    let mut new_total_holded = num(&launch.total_token_holded) - &event.amount;
    if new_total_holded < zero {
        new_total_holded = zero.clone();
    }

    let price = curve::spot_price(&new_supply, &new_liquidity, &total_supply, &threshold);
    let market_cap = curve::market_cap(&total_supply, &price);

    ctx.store
        .update_launch_market(
            &event.token_address,
            MarketUpdate {
                current_supply: new_supply,
                liquidity_raised: new_liquidity,
                total_token_holded: new_total_holded,
                price: price.clone(),
                market_cap,
            },
        )
        .await?;

    match ctx
        .store
        .find_shares(&event.caller, &event.token_address)
        .await?
    {
        Some(mut position) => {
            position.amount_owned -= &event.amount;
            if position.amount_owned < zero {
                warn!(
                    owner = %event.caller,
                    token = %event.token_address,
                    "sell exceeds owned shares, clamping"
                );
                position.amount_owned = zero.clone();
            }
            position.amount_sell += &event.amount;
            position.total_received += &event.quote_amount;
            position.is_claimable = position.amount_owned > zero;
            ctx.store.upsert_shares(position).await?;
        }
        None => {
            warn!(
                owner = %event.caller,
                token = %event.token_address,
                "sell from unknown shareholder, recording ledger only"
            );
        }
    }

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
        transaction_type: "sell".to_string(),
        time_stamp: Some(meta.event_timestamp(event.timestamp)),
    };
    match ctx.store.insert_transaction(ledger).await {
        Ok(()) => {
            info!(token = %event.token_address, transfer_id = %meta.transfer_id, "sell projected")
        }
        Err(StoreError::Duplicate) => {
            debug!(transfer_id = %meta.transfer_id, "sell ledger row already present")
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
