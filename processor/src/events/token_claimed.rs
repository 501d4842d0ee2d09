use bigdecimal::BigDecimal;

use super::{DecodeError, DecodedEvent};

/// Vested tokens withdrawn by a shareholder.
#[derive(Debug, Clone)]
pub struct TokenClaimedEvent {
    pub token_address: String,
    pub owner: String,
    pub amount: BigDecimal,
    pub timestamp: u64,
}

impl TokenClaimedEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            token_address: event.address("token_address")?,
            owner: event.address("owner")?,
            amount: event.amount("amount"),
            timestamp: event.u64("timestamp"),
        })
    }
}
