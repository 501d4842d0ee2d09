use bigdecimal::BigDecimal;

use super::{DecodeError, DecodedEvent};

/// A bonding-curve market was opened for a deployed token.
#[derive(Debug, Clone)]
pub struct CreateLaunchEvent {
    pub caller: String,
    pub token_address: String,
    pub quote_token: String,
    pub price: BigDecimal,
    pub total_supply: BigDecimal,
    pub threshold_liquidity: BigDecimal,
    pub bonding_type: Option<String>,
}

impl CreateLaunchEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            caller: event.address("caller")?,
            token_address: event.address("token_address")?,
            quote_token: event.address("quote_token_address")?,
            price: event.amount("price"),
            total_supply: event.amount("total_supply"),
            threshold_liquidity: event.amount("threshold_liquidity"),
            bonding_type: event.variant("bonding_type"),
        })
    }
}
