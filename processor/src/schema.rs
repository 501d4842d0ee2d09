//! Versioned schema for the launchpad contract's event layouts.
//!
//! The decoder is driven entirely by these member tables: each event
//! declares its key and data members with their Cairo types, and the
//! decoder walks the declaration against the raw word lists. Event
//! selectors are the Starknet convention: keccak-256 of the plain event
//! name truncated to 250 bits.

use std::collections::HashMap;
use std::sync::OnceLock;

use alloy::primitives::{keccak256, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Key,
    Data,
}

/// Cairo member types the decoder understands. `U256` spans two words
/// (low then high 128 bits); `ByteArray` is variable length; everything
/// else is a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Felt,
    U64,
    U256,
    Bool,
    ContractAddress,
    ByteArray,
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct EventMember {
    pub name: &'static str,
    pub ty: MemberType,
    pub kind: MemberKind,
}

#[derive(Debug, Clone, Copy)]
pub struct EventSchema {
    pub name: &'static str,
    pub members: &'static [EventMember],
}

const fn key(name: &'static str, ty: MemberType) -> EventMember {
    EventMember {
        name,
        ty,
        kind: MemberKind::Key,
    }
}

const fn data(name: &'static str, ty: MemberType) -> EventMember {
    EventMember {
        name,
        ty,
        kind: MemberKind::Data,
    }
}

pub const BONDING_TYPES: &[&str] = &["Linear", "Exponential"];
pub const EXCHANGES: &[&str] = &["Jediswap", "Ekubo"];

/// The launchpad event allow-list. Selectors not present here are ignored
/// by the driver.
pub const LAUNCHPAD_EVENTS: &[EventSchema] = &[
    EventSchema {
        name: "CreateToken",
        members: &[
            key("caller", MemberType::ContractAddress),
            key("token_address", MemberType::ContractAddress),
            data("symbol", MemberType::ByteArray),
            data("name", MemberType::ByteArray),
            data("initial_supply", MemberType::U256),
            data("total_supply", MemberType::U256),
        ],
    },
    EventSchema {
        name: "CreateLaunch",
        members: &[
            key("caller", MemberType::ContractAddress),
            key("token_address", MemberType::ContractAddress),
            key("quote_token_address", MemberType::ContractAddress),
            data("amount", MemberType::U256),
            data("price", MemberType::U256),
            data("total_supply", MemberType::U256),
            data("slope", MemberType::U256),
            data("threshold_liquidity", MemberType::U256),
            data("bonding_type", MemberType::Enum(BONDING_TYPES)),
        ],
    },
    EventSchema {
        name: "BuyToken",
        members: &[
            key("caller", MemberType::ContractAddress),
            key("token_address", MemberType::ContractAddress),
            data("amount", MemberType::U256),
            data("protocol_fee", MemberType::U256),
            data("timestamp", MemberType::U64),
            data("quote_amount", MemberType::U256),
        ],
    },
    EventSchema {
        name: "SellToken",
        members: &[
            key("caller", MemberType::ContractAddress),
            key("key_user", MemberType::ContractAddress),
            data("amount", MemberType::U256),
            data("protocol_fee", MemberType::U256),
            data("creator_fee", MemberType::U256),
            data("timestamp", MemberType::U64),
            data("coin_amount", MemberType::U256),
        ],
    },
    EventSchema {
        name: "TokenClaimed",
        members: &[
            key("token_address", MemberType::ContractAddress),
            key("owner", MemberType::ContractAddress),
            data("amount", MemberType::U256),
            data("timestamp", MemberType::U64),
        ],
    },
    EventSchema {
        name: "LiquidityCreated",
        members: &[
            key("id", MemberType::U256),
            key("pool", MemberType::ContractAddress),
            key("asset", MemberType::ContractAddress),
            key("quote_token_address", MemberType::ContractAddress),
            data("owner", MemberType::ContractAddress),
            data("exchange", MemberType::Enum(EXCHANGES)),
            data("is_unruggable", MemberType::Bool),
            data("final_price", MemberType::U256),
            data("final_market_cap", MemberType::U256),
        ],
    },
    EventSchema {
        name: "LiquidityCanBeAdded",
        members: &[
            key("pool", MemberType::ContractAddress),
            key("asset", MemberType::ContractAddress),
            key("quote_token_address", MemberType::ContractAddress),
        ],
    },
    EventSchema {
        name: "CreatorFeeDistributed",
        members: &[
            key("token_address", MemberType::ContractAddress),
            data("amount", MemberType::U256),
            data("creator_fee_destination", MemberType::ContractAddress),
            data("memecoin_address", MemberType::ContractAddress),
        ],
    },
    EventSchema {
        name: "MetadataCoinAdded",
        members: &[
            key("token_address", MemberType::ContractAddress),
            data("nostr_event_id", MemberType::U256),
            data("url", MemberType::ByteArray),
            data("timestamp", MemberType::U64),
            data("twitter", MemberType::ByteArray),
            data("website", MemberType::ByteArray),
            data("telegram", MemberType::ByteArray),
            data("github", MemberType::ByteArray),
        ],
    },
];

/// Starknet event selector: keccak-256 of the event name, truncated to
/// 250 bits.
pub fn selector_from_name(name: &str) -> U256 {
    let digest = U256::from_be_bytes(keccak256(name.as_bytes()).0);
    let mask = (U256::from(1u8) << 250) - U256::from(1u8);
    digest & mask
}

fn selector_table() -> &'static HashMap<U256, &'static EventSchema> {
    static TABLE: OnceLock<HashMap<U256, &'static EventSchema>> = OnceLock::new();
    TABLE.get_or_init(|| {
        LAUNCHPAD_EVENTS
            .iter()
            .map(|schema| (selector_from_name(schema.name), schema))
            .collect()
    })
}

/// Look up the schema for a raw event selector (keys[0])
pub fn for_selector(selector: U256) -> Option<&'static EventSchema> {
    selector_table().get(&selector).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn buy_token_selector_matches_contract() {
        // Known selector emitted by the deployed launchpad contract
        let expected =
            U256::from_str("0x00cb205b7506d21e6fe528cd4ae2ce69ae63eb6fc10a2d0234dd39ef3d349797")
                .unwrap();
        assert_eq!(selector_from_name("BuyToken"), expected);
    }

    #[test]
    fn all_events_resolve_by_selector() {
        for schema in LAUNCHPAD_EVENTS {
            let resolved = for_selector(selector_from_name(schema.name))
                .unwrap_or_else(|| panic!("selector lookup failed for {}", schema.name));
            assert_eq!(resolved.name, schema.name);
        }
    }

    #[test]
    fn unknown_selector_is_none() {
        assert!(for_selector(selector_from_name("Transfer")).is_none());
    }
}
