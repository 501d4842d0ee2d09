use bigdecimal::BigDecimal;

use super::{DecodeError, DecodedEvent};

/// Graduation: the raised liquidity was moved into an AMM pool.
#[derive(Debug, Clone)]
pub struct LiquidityCreatedEvent {
    pub pool: String,
    pub asset: String,
    pub quote_token: String,
    pub owner: String,
    pub exchange: Option<String>,
    pub final_price: BigDecimal,
    pub final_market_cap: BigDecimal,
}

impl LiquidityCreatedEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            pool: event.address("pool")?,
            asset: event.address("asset")?,
            quote_token: event.address("quote_token_address")?,
            owner: event.address("owner")?,
            exchange: event.variant("exchange"),
            final_price: event.amount("final_price"),
            final_market_cap: event.amount("final_market_cap"),
        })
    }
}
