//! Projection handlers, one per launchpad event.
//!
//! Every handler follows the same shape: an idempotency guard on the
//! natural key, a fresh read of the prior state, clamped full-field
//! writes, and an append to the transaction ledger. Out-of-bound values
//! are clamped and logged, never propagated as errors.

pub mod buy_token;
pub mod create_launch;
pub mod create_token;
pub mod creator_fee_distributed;
pub mod liquidity_can_be_added;
pub mod liquidity_created;
pub mod metadata_coin_added;
pub mod sell_token;
pub mod token_claimed;

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeZone, Utc};

use crate::metadata::MetadataResolver;
use crate::store::{Store, StoreError};

pub type HandlerResult<T> = Result<T, StoreError>;

/// Shared handler dependencies.
pub struct HandlerContext {
    pub store: Arc<dyn Store>,
    pub metadata: MetadataResolver,
    pub network: String,
}

/// Envelope facts shared by every handler.
#[derive(Debug, Clone)]
pub struct EventMeta {
    pub transaction_hash: String,
    /// Idempotency key: `{transaction_hash}_{event_index}`.
    pub transfer_id: String,
    pub block_timestamp: DateTime<Utc>,
}

impl EventMeta {
    /// Ledger timestamp: the event's own clock when present, otherwise
    /// the block timestamp.
    pub fn event_timestamp(&self, event_seconds: u64) -> DateTime<Utc> {
        if event_seconds == 0 {
            return self.block_timestamp;
        }
        i64::try_from(event_seconds)
            .ok()
            .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single())
            .unwrap_or(self.block_timestamp)
    }
}

/// Projected numeric columns are nullable; arithmetic treats NULL as zero.
pub(crate) fn num(value: &Option<BigDecimal>) -> BigDecimal {
    value.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> EventMeta {
        EventMeta {
            transaction_hash: "0x1".to_string(),
            transfer_id: "0x1_0".to_string(),
            block_timestamp: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap(),
        }
    }

    #[test]
    fn event_clock_overrides_block_time() {
        assert_eq!(
            meta().event_timestamp(1_700_000_100).timestamp(),
            1_700_000_100
        );
    }

    #[test]
    fn zero_event_clock_falls_back_to_block_time() {
        let meta = meta();
        assert_eq!(meta.event_timestamp(0), meta.block_timestamp);
    }

    #[test]
    fn oversized_event_clock_falls_back_to_block_time() {
        let meta = meta();
        assert_eq!(meta.event_timestamp(u64::MAX), meta.block_timestamp);
        assert_eq!(meta.event_timestamp(i64::MAX as u64 + 1), meta.block_timestamp);
    }
}
