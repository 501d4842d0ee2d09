//! Schema-driven event decoding.
//!
//! Raw envelopes carry the selector in `keys[0]`, the remaining key words,
//! and the data words. `decode_event` walks an [`EventSchema`] declaration
//! against those word lists and produces named, typed args; the per-event
//! modules then lift the args into one struct per event kind.

pub mod buy_token;
pub mod create_launch;
pub mod create_token;
pub mod creator_fee_distributed;
pub mod liquidity_can_be_added;
pub mod liquidity_created;
pub mod metadata_coin_added;
pub mod sell_token;
pub mod token_claimed;

use std::collections::HashMap;

use alloy::primitives::U256;
use bigdecimal::{
    num_bigint::{BigInt, Sign},
    BigDecimal,
};
use thiserror::Error;

use crate::schema::{self, EventMember, EventSchema, MemberKind, MemberType};
use crate::stream::EventEnvelope;

/// Token amounts are fixed-point with 18 decimals on chain.
pub const TOKEN_DECIMALS: i64 = 18;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid field element `{0}`")]
    InvalidWord(String),

    #[error("`{event}` is truncated: no {section} word left for `{field}`")]
    Truncated {
        event: &'static str,
        section: &'static str,
        field: &'static str,
    },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("`{field}` does not fit its declared width")]
    OutOfRange { field: &'static str },

    #[error("`{field}` is not a boolean word")]
    InvalidBool { field: &'static str },

    #[error("`{field}` enum index {index} is out of range")]
    UnknownVariant { field: &'static str, index: usize },
}

/// A decoded member value, typed per the schema declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Felt(U256),
    Uint(U256),
    U64(u64),
    Bool(bool),
    Address(String),
    Text(String),
    Variant(&'static str),
}

/// Schema-decoded event with named args.
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    pub name: &'static str,
    pub args: HashMap<&'static str, Value>,
}

impl DecodedEvent {
    /// Required address member; absence is a decode error.
    pub fn address(&self, name: &'static str) -> Result<String, DecodeError> {
        match self.args.get(name) {
            Some(Value::Address(address)) => Ok(address.clone()),
            _ => Err(DecodeError::MissingField(name)),
        }
    }

    /// u256 amount scaled to 18-decimal token units; missing numeric
    /// members decode as zero.
    pub fn amount(&self, name: &str) -> BigDecimal {
        match self.args.get(name) {
            Some(Value::Uint(raw)) => to_token_units(*raw),
            _ => BigDecimal::from(0),
        }
    }

    pub fn u64(&self, name: &str) -> u64 {
        match self.args.get(name) {
            Some(Value::U64(value)) => *value,
            _ => 0,
        }
    }

    pub fn text(&self, name: &str) -> String {
        match self.args.get(name) {
            Some(Value::Text(text)) => text.clone(),
            _ => String::new(),
        }
    }

    pub fn variant(&self, name: &str) -> Option<String> {
        match self.args.get(name) {
            Some(Value::Variant(variant)) => Some((*variant).to_string()),
            _ => None,
        }
    }
}

/// Parse one hex word into a field element.
pub fn parse_word(word: &str) -> Result<U256, DecodeError> {
    let digits = word.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16).map_err(|_| DecodeError::InvalidWord(word.to_string()))
}

/// Canonical 32-byte zero-padded address string.
pub fn format_address(word: U256) -> String {
    format!("0x{}", alloy::hex::encode(word.to_be_bytes::<32>()))
}

/// Decode a Cairo short string: big-endian ASCII bytes of a single felt.
pub fn decode_short_string(word: U256) -> String {
    let bytes = word.to_be_bytes::<32>();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(32);
    String::from_utf8_lossy(&bytes[start..]).into_owned()
}

/// Scale a raw on-chain u256 to 18-decimal token units.
pub fn to_token_units(raw: U256) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
    BigDecimal::new(digits, TOKEN_DECIMALS)
}

struct Words<'a> {
    event: &'static str,
    section: &'static str,
    words: &'a [String],
    pos: usize,
}

impl Words<'_> {
    fn next(&mut self, field: &'static str) -> Result<U256, DecodeError> {
        let word = self.words.get(self.pos).ok_or(DecodeError::Truncated {
            event: self.event,
            section: self.section,
            field,
        })?;
        self.pos += 1;
        parse_word(word)
    }
}

/// Decode a raw envelope against its schema declaration.
pub fn decode_event(
    schema: &'static EventSchema,
    event: &EventEnvelope,
) -> Result<DecodedEvent, DecodeError> {
    // keys[0] is the selector itself
    let mut keys = Words {
        event: schema.name,
        section: "key",
        words: &event.keys,
        pos: 1,
    };
    let mut data = Words {
        event: schema.name,
        section: "data",
        words: &event.data,
        pos: 0,
    };

    let mut args = HashMap::new();
    for member in schema.members {
        let words = match member.kind {
            MemberKind::Key => &mut keys,
            MemberKind::Data => &mut data,
        };
        args.insert(member.name, decode_member(member, words)?);
    }

    Ok(DecodedEvent {
        name: schema.name,
        args,
    })
}

fn decode_member(member: &EventMember, words: &mut Words<'_>) -> Result<Value, DecodeError> {
    match member.ty {
        MemberType::Felt => Ok(Value::Felt(words.next(member.name)?)),
        MemberType::ContractAddress => {
            Ok(Value::Address(format_address(words.next(member.name)?)))
        }
        MemberType::U64 => {
            let word = words.next(member.name)?;
            u64::try_from(word)
                .map(Value::U64)
                .map_err(|_| DecodeError::OutOfRange { field: member.name })
        }
        MemberType::Bool => {
            let word = words.next(member.name)?;
            if word == U256::ZERO {
                Ok(Value::Bool(false))
            } else if word == U256::from(1u8) {
                Ok(Value::Bool(true))
            } else {
                Err(DecodeError::InvalidBool { field: member.name })
            }
        }
        MemberType::U256 => {
            // low 128 bits first, then high
            let low = words.next(member.name)?;
            let high = words.next(member.name)?;
            Ok(Value::Uint((high << 128) | low))
        }
        MemberType::Enum(variants) => {
            let word = words.next(member.name)?;
            let index = usize::try_from(word)
                .map_err(|_| DecodeError::OutOfRange { field: member.name })?;
            variants
                .get(index)
                .copied()
                .map(Value::Variant)
                .ok_or(DecodeError::UnknownVariant {
                    field: member.name,
                    index,
                })
        }
        MemberType::ByteArray => decode_byte_array(member.name, words).map(Value::Text),
    }
}

/// Cairo `ByteArray` layout: `[n, word_0..word_{n-1}, pending_word,
/// pending_word_len]` where each full word packs 31 big-endian bytes and
/// the pending word holds the trailing `pending_word_len` bytes.
fn decode_byte_array(field: &'static str, words: &mut Words<'_>) -> Result<String, DecodeError> {
    let full_words = usize::try_from(words.next(field)?)
        .map_err(|_| DecodeError::OutOfRange { field })?;

    // the count word is stream-controlled: reject counts the payload cannot
    // carry before trusting them for an allocation
    let remaining = words.words.len().saturating_sub(words.pos);
    if remaining < full_words.saturating_add(2) {
        return Err(DecodeError::Truncated {
            event: words.event,
            section: words.section,
            field,
        });
    }

    let mut bytes = Vec::with_capacity(full_words * 31 + 31);
    for _ in 0..full_words {
        let word = words.next(field)?.to_be_bytes::<32>();
        bytes.extend_from_slice(&word[1..]);
    }

    let pending = words.next(field)?.to_be_bytes::<32>();
    let pending_len = usize::try_from(words.next(field)?)
        .ok()
        .filter(|len| *len <= 31)
        .ok_or(DecodeError::OutOfRange { field })?;
    bytes.extend_from_slice(&pending[32 - pending_len..]);

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A fully decoded launchpad event, one variant per allow-listed kind.
#[derive(Debug, Clone)]
pub enum LaunchpadEvent {
    CreateToken(create_token::CreateTokenEvent),
    CreateLaunch(create_launch::CreateLaunchEvent),
    BuyToken(buy_token::BuyTokenEvent),
    SellToken(sell_token::SellTokenEvent),
    TokenClaimed(token_claimed::TokenClaimedEvent),
    LiquidityCreated(liquidity_created::LiquidityCreatedEvent),
    LiquidityCanBeAdded(liquidity_can_be_added::LiquidityCanBeAddedEvent),
    CreatorFeeDistributed(creator_fee_distributed::CreatorFeeDistributedEvent),
    MetadataCoinAdded(metadata_coin_added::MetadataCoinAddedEvent),
}

impl LaunchpadEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LaunchpadEvent::CreateToken(_) => "CreateToken",
            LaunchpadEvent::CreateLaunch(_) => "CreateLaunch",
            LaunchpadEvent::BuyToken(_) => "BuyToken",
            LaunchpadEvent::SellToken(_) => "SellToken",
            LaunchpadEvent::TokenClaimed(_) => "TokenClaimed",
            LaunchpadEvent::LiquidityCreated(_) => "LiquidityCreated",
            LaunchpadEvent::LiquidityCanBeAdded(_) => "LiquidityCanBeAdded",
            LaunchpadEvent::CreatorFeeDistributed(_) => "CreatorFeeDistributed",
            LaunchpadEvent::MetadataCoinAdded(_) => "MetadataCoinAdded",
        }
    }
}

/// Match `keys[0]` against the allow-list and decode into a typed event.
/// `Ok(None)` means the selector is not a launchpad event.
pub fn parse_event(event: &EventEnvelope) -> Result<Option<LaunchpadEvent>, DecodeError> {
    let Some(first_key) = event.keys.first() else {
        return Ok(None);
    };
    let selector = parse_word(first_key)?;
    let Some(schema) = schema::for_selector(selector) else {
        return Ok(None);
    };

    // MetadataCoinAdded payloads drifted from the declared layout on chain;
    // the raw short-string segment scan is authoritative for that event.
    if schema.name == "MetadataCoinAdded" {
        return metadata_coin_added::MetadataCoinAddedEvent::from_raw(event)
            .map(LaunchpadEvent::MetadataCoinAdded)
            .map(Some);
    }

    let decoded = decode_event(schema, event)?;
    let parsed = match schema.name {
        "CreateToken" => {
            LaunchpadEvent::CreateToken(create_token::CreateTokenEvent::from_decoded(&decoded)?)
        }
        "CreateLaunch" => {
            LaunchpadEvent::CreateLaunch(create_launch::CreateLaunchEvent::from_decoded(&decoded)?)
        }
        "BuyToken" => {
            LaunchpadEvent::BuyToken(buy_token::BuyTokenEvent::from_decoded(&decoded)?)
        }
        "SellToken" => {
            LaunchpadEvent::SellToken(sell_token::SellTokenEvent::from_decoded(&decoded)?)
        }
        "TokenClaimed" => {
            LaunchpadEvent::TokenClaimed(token_claimed::TokenClaimedEvent::from_decoded(&decoded)?)
        }
        "LiquidityCreated" => LaunchpadEvent::LiquidityCreated(
            liquidity_created::LiquidityCreatedEvent::from_decoded(&decoded)?,
        ),
        "LiquidityCanBeAdded" => LaunchpadEvent::LiquidityCanBeAdded(
            liquidity_can_be_added::LiquidityCanBeAddedEvent::from_decoded(&decoded)?,
        ),
        "CreatorFeeDistributed" => LaunchpadEvent::CreatorFeeDistributed(
            creator_fee_distributed::CreatorFeeDistributedEvent::from_decoded(&decoded)?,
        ),
        _ => return Ok(None),
    };

    Ok(Some(parsed))
}
