use bigdecimal::BigDecimal;

use super::{DecodeError, DecodedEvent};

/// Tokens bought from the bonding curve.
#[derive(Debug, Clone)]
pub struct BuyTokenEvent {
    pub caller: String,
    pub token_address: String,
    pub amount: BigDecimal,
    pub quote_amount: BigDecimal,
    pub protocol_fee: BigDecimal,
    /// On-chain clock of the trade, unix seconds. Zero when absent.
    pub timestamp: u64,
}

impl BuyTokenEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            caller: event.address("caller")?,
            token_address: event.address("token_address")?,
            amount: event.amount("amount"),
            quote_amount: event.amount("quote_amount"),
            protocol_fee: event.amount("protocol_fee"),
            timestamp: event.u64("timestamp"),
        })
    }
}
