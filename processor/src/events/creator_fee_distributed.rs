use bigdecimal::BigDecimal;

use super::{DecodeError, DecodedEvent};

/// Accrued creator fees paid out to their destination address.
#[derive(Debug, Clone)]
pub struct CreatorFeeDistributedEvent {
    pub memecoin_address: String,
    pub creator_fee_destination: String,
    pub amount: BigDecimal,
}

impl CreatorFeeDistributedEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Result<Self, DecodeError> {
        Ok(Self {
            memecoin_address: event.address("memecoin_address")?,
            creator_fee_destination: event.address("creator_fee_destination")?,
            amount: event.amount("amount"),
        })
    }
}
