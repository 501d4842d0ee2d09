use bigdecimal::BigDecimal;

use super::{DecodeError, DecodedEvent};

/// Tokens sold back into the bonding curve. The token address rides in the
/// second key slot, `key_user` in the contract's layout.
#[derive(Debug, Clone)]
pub struct SellTokenEvent {
    pub caller: String,
    pub token_address: String,
    pub amount: BigDecimal,
    pub quote_amount: BigDecimal,
    pub protocol_fee: BigDecimal,
    pub timestamp: u64,
}

impl SellTokenEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            caller: event.address("caller")?,
            token_address: event.address("key_user")?,
            amount: event.amount("amount"),
            quote_amount: event.amount("coin_amount"),
            protocol_fee: event.amount("protocol_fee"),
            timestamp: event.u64("timestamp"),
        })
    }
}
