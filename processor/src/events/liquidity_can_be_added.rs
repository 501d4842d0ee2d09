use super::{DecodeError, DecodedEvent};

/// The curve crossed its threshold; liquidity may now be moved to an AMM.
#[derive(Debug, Clone)]
pub struct LiquidityCanBeAddedEvent {
    pub pool: String,
    pub asset: String,
    pub quote_token: String,
}

impl LiquidityCanBeAddedEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            pool: event.address("pool")?,
            asset: event.address("asset")?,
            quote_token: event.address("quote_token_address")?,
        })
    }
}
