//! Block driver: routes each event of a block, in delivery order, to
//! exactly one projection handler.

use tracing::{debug, error, warn};

use crate::events::{self, LaunchpadEvent};
use crate::handlers::{self, EventMeta, HandlerContext, HandlerResult};
use crate::stream::Block;

/// Process one block. Handler failures are isolated per event: a failed
/// event is logged and the rest of the block still runs.
pub async fn process_block(ctx: &HandlerContext, block: &Block) {
    debug!(events = block.events.len(), "processing block");

    for envelope in &block.events {
        if envelope.transaction_hash.is_empty() {
            continue;
        }

        let event = match events::parse_event(envelope) {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!(tx = %envelope.transaction_hash, "ignoring unmatched selector");
                continue;
            }
            Err(decode_error) => {
                warn!(
                    tx = %envelope.transaction_hash,
                    error = %decode_error,
                    "undecodable event skipped"
                );
                continue;
            }
        };

        let meta = EventMeta {
            transaction_hash: envelope.transaction_hash.clone(),
            transfer_id: envelope.transfer_id(),
            block_timestamp: block.header.timestamp_utc(),
        };

        if let Err(handler_error) = dispatch(ctx, &event, &meta).await {
            error!(
                event = event.name(),
                tx = %meta.transaction_hash,
                error = %handler_error,
                "handler failed, continuing block"
            );
        }
    }
}

async fn dispatch(
    ctx: &HandlerContext,
    event: &LaunchpadEvent,
    meta: &EventMeta,
) -> HandlerResult<()> {
    match event {
        LaunchpadEvent::CreateToken(ev) => handlers::create_token::handle(ctx, ev, meta).await,
        LaunchpadEvent::CreateLaunch(ev) => handlers::create_launch::handle(ctx, ev, meta).await,
        LaunchpadEvent::BuyToken(ev) => handlers::buy_token::handle(ctx, ev, meta).await,
        LaunchpadEvent::SellToken(ev) => handlers::sell_token::handle(ctx, ev, meta).await,
        LaunchpadEvent::TokenClaimed(ev) => handlers::token_claimed::handle(ctx, ev, meta).await,
        LaunchpadEvent::LiquidityCreated(ev) => {
            handlers::liquidity_created::handle(ctx, ev, meta).await
        }
        LaunchpadEvent::LiquidityCanBeAdded(ev) => {
            handlers::liquidity_can_be_added::handle(ctx, ev, meta).await
        }
        LaunchpadEvent::CreatorFeeDistributed(ev) => {
            handlers::creator_fee_distributed::handle(ctx, ev, meta).await
        }
        LaunchpadEvent::MetadataCoinAdded(ev) => {
            handlers::metadata_coin_added::handle(ctx, ev, meta).await
        }
    }
}
