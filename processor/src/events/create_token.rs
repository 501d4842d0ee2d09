use bigdecimal::BigDecimal;

use super::{DecodeError, DecodedEvent};

/// A new token contract was deployed through the launchpad.
#[derive(Debug, Clone)]
pub struct CreateTokenEvent {
    pub caller: String,
    pub token_address: String,
    pub symbol: String,
    pub name: String,
    pub initial_supply: BigDecimal,
    pub total_supply: BigDecimal,
}

impl CreateTokenEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            caller: event.address("caller")?,
            token_address: event.address("token_address")?,
            symbol: event.text("symbol"),
            name: event.text("name"),
            initial_supply: event.amount("initial_supply"),
            total_supply: event.amount("total_supply"),
        })
    }
}
