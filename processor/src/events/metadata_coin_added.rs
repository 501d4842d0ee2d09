use alloy::primitives::U256;

use super::{decode_short_string, format_address, parse_word, DecodeError};
use crate::stream::EventEnvelope;

/// Off-chain metadata attached to a token.
///
/// Deployed contracts pack the three string fields (`url`, `ipfs_hash`,
/// `ipfs_url`) as runs of short-string felts rather than the `ByteArray`
/// layout the ABI declares, with a numeric length felt closing each run.
/// This struct is therefore built by a raw scan of the data words instead
/// of the schema decoder.
#[derive(Debug, Clone)]
pub struct MetadataCoinAddedEvent {
    pub token_address: String,
    /// Decimal rendering of the nostr event id u256.
    pub nostr_event_id: String,
    pub url: String,
    pub ipfs_hash: String,
    pub ipfs_url: String,
}

impl MetadataCoinAddedEvent {
    pub fn from_raw(event: &EventEnvelope) -> Result<Self, DecodeError> {
        let token_word = event
            .keys
            .get(1)
            .ok_or(DecodeError::MissingField("token_address"))?;
        let token_address = format_address(parse_word(token_word)?);

        // nostr_event_id is a u256: low word then high word
        let low = match event.data.first() {
            Some(word) => parse_word(word)?,
            None => U256::ZERO,
        };
        let high = match event.data.get(1) {
            Some(word) => parse_word(word)?,
            None => U256::ZERO,
        };
        let raw_id: U256 = (high << 128) | low;
        let nostr_event_id = raw_id.to_string();

        let mut cursor = 2;
        let url = next_segment(&event.data, &mut cursor)?;
        let ipfs_hash = next_segment(&event.data, &mut cursor)?;
        let ipfs_url = next_segment(&event.data, &mut cursor)?;

        Ok(Self {
            token_address,
            nostr_event_id,
            url,
            ipfs_hash,
            ipfs_url,
        })
    }
}

/// Accumulate short-string chunks until the numeric length felt that
/// terminates the segment, then sanitize the assembled text.
fn next_segment(data: &[String], cursor: &mut usize) -> Result<String, DecodeError> {
    let mut assembled = String::new();
    while *cursor < data.len() {
        let chunk = decode_short_string(parse_word(&data[*cursor])?);
        *cursor += 1;
        if is_numeric(&chunk) {
            break;
        }
        assembled.push_str(&chunk);
    }
    Ok(sanitize(&assembled))
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Strip bytes outside the metadata charset and trim the result.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || c.is_whitespace() || "-_.!@#$%^&*()/:".contains(*c)
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn felt_hex(bytes: &[u8]) -> String {
        let mut word = [0u8; 32];
        word[32 - bytes.len()..].copy_from_slice(bytes);
        format!("0x{}", alloy::hex::encode(word))
    }

    fn envelope(data: Vec<String>) -> EventEnvelope {
        EventEnvelope {
            transaction_hash: "0xdead".to_string(),
            address: None,
            keys: vec!["0x0".to_string(), "0xabc".to_string()],
            data,
            event_index_in_transaction: Some(0),
        }
    }

    #[test]
    fn splits_segments_on_numeric_terminators() {
        let data = vec![
            "0x9".to_string(), // nostr_event_id low
            "0x0".to_string(), // nostr_event_id high
            felt_hex(b"https://example"),
            felt_hex(b".com/meta.json"),
            felt_hex(b"29"), // url length terminator
            felt_hex(b"QmYwAPJzv5CZsnAzt8auVZRn"),
            felt_hex(b"24"),
            felt_hex(b"ipfs://QmYwAPJzv5"),
            felt_hex(b"CZsnAzt8auVZRn"),
            felt_hex(b"31"),
        ];
        let event = MetadataCoinAddedEvent::from_raw(&envelope(data)).unwrap();
        assert_eq!(event.nostr_event_id, "9");
        assert_eq!(event.url, "https://example.com/meta.json");
        assert_eq!(event.ipfs_hash, "QmYwAPJzv5CZsnAzt8auVZRn");
        assert_eq!(event.ipfs_url, "ipfs://QmYwAPJzv5CZsnAzt8auVZRn");
    }

    #[test]
    fn missing_trailing_segments_decode_empty() {
        let data = vec![
            "0x0".to_string(),
            "0x0".to_string(),
            felt_hex(b"https://a.io"),
            felt_hex(b"12"),
        ];
        let event = MetadataCoinAddedEvent::from_raw(&envelope(data)).unwrap();
        assert_eq!(event.url, "https://a.io");
        assert_eq!(event.ipfs_hash, "");
        assert_eq!(event.ipfs_url, "");
    }

    #[test]
    fn sanitize_strips_stray_control_bytes() {
        assert_eq!(sanitize("  ipfs://Qm\u{1}abc\u{7f}  "), "ipfs://Qmabc");
        assert_eq!(sanitize("name \"quoted\""), "name quoted");
    }

    #[test]
    fn nostr_event_id_spans_both_words() {
        // low = 5, high = 1 -> 2^128 + 5
        let data = vec!["0x5".to_string(), "0x1".to_string()];
        let event = MetadataCoinAddedEvent::from_raw(&envelope(data)).unwrap();
        assert_eq!(
            event.nostr_event_id,
            "340282366920938463463374607431768211461"
        );
    }
}
