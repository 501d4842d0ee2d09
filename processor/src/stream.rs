//! Raw stream payload model: blocks and event envelopes as queued by the
//! ingestion side.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    #[serde(default)]
    pub events: Vec<EventEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Unix seconds
    pub timestamp: i64,
    #[serde(default)]
    pub block_number: Option<u64>,
}

impl BlockHeader {
    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.timestamp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub transaction_hash: String,
    /// Emitting contract
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub event_index_in_transaction: Option<i64>,
}

impl EventEnvelope {
    /// Idempotency key: `{transaction_hash}_{event_index}`, index 0 when
    /// the stream does not carry a per-event ordinal.
    pub fn transfer_id(&self) -> String {
        format!(
            "{}_{}",
            self.transaction_hash,
            self.event_index_in_transaction.unwrap_or(0)
        )
    }
}
