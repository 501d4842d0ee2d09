//! End-to-end projection tests: raw event envelopes through the block
//! driver into the in-memory store.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bigdecimal::BigDecimal;
use processor::handlers::HandlerContext;
use processor::metadata::MetadataResolver;
use processor::retry::RetryPolicy;
use processor::schema::selector_from_name;
use processor::service;
use processor::store::{MemoryStore, Store};
use processor::stream::{Block, BlockHeader, EventEnvelope};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn addr(n: u64) -> String {
    format!("0x{n:064x}")
}

fn selector(name: &str) -> String {
    format!("0x{:x}", selector_from_name(name))
}

/// A raw on-chain u256 amount: low then high 128-bit word, each encoded
/// as a big-endian felt.
fn u256(raw: u128) -> Vec<String> {
    vec![format!("0x{raw:x}"), "0x0".to_string()]
}

/// Whole tokens as a raw 18-decimal amount.
fn tokens(n: u64) -> u128 {
    n as u128 * 10u128.pow(18)
}

fn felt_hex(bytes: &[u8]) -> String {
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(bytes);
    format!("0x{}", alloy::hex::encode(word))
}

/// Cairo ByteArray words for a short (< 31 byte) string.
fn byte_array(text: &str) -> Vec<String> {
    vec![
        "0x0".to_string(),
        felt_hex(text.as_bytes()),
        format!("0x{:x}", text.len()),
    ]
}

fn envelope(tx: &str, keys: Vec<String>, data: Vec<String>) -> EventEnvelope {
    EventEnvelope {
        transaction_hash: tx.to_string(),
        address: None,
        keys,
        data,
        event_index_in_transaction: Some(0),
    }
}

fn block(events: Vec<EventEnvelope>) -> Block {
    Block {
        header: BlockHeader {
            timestamp: 1_700_000_000,
            block_number: Some(1),
        },
        events,
    }
}

fn context(store: &Arc<MemoryStore>) -> HandlerContext {
    let resolver = MetadataResolver::new(
        "http://127.0.0.1:1/ipfs/".to_string(),
        RetryPolicy::new(2, Duration::from_millis(5), Duration::from_millis(200)),
    )
    .expect("resolver");
    HandlerContext {
        store: Arc::clone(store) as Arc<dyn Store>,
        metadata: resolver,
        network: "starknet-sepolia".to_string(),
    }
}

fn create_token(tx: &str, owner: u64, token: u64, total: u64) -> EventEnvelope {
    let mut data = byte_array("MEME");
    data.extend(byte_array("Meme Coin"));
    data.extend(u256(tokens(total)));
    data.extend(u256(tokens(total)));
    envelope(
        tx,
        vec![selector("CreateToken"), addr(owner), addr(token)],
        data,
    )
}

fn create_launch(tx: &str, owner: u64, token: u64, total: u64, threshold: u64) -> EventEnvelope {
    let mut data = u256(0); // amount
    data.extend(u256(0)); // price
    data.extend(u256(tokens(total)));
    data.extend(u256(0)); // slope
    data.extend(u256(tokens(threshold)));
    data.push("0x0".to_string()); // Linear
    envelope(
        tx,
        vec![
            selector("CreateLaunch"),
            addr(owner),
            addr(token),
            addr(99), // quote token
        ],
        data,
    )
}

fn buy(tx: &str, caller: u64, token: u64, amount: u64, quote: u64) -> EventEnvelope {
    let mut data = u256(tokens(amount));
    data.extend(u256(0)); // protocol fee
    data.push("0x0".to_string()); // timestamp
    data.extend(u256(tokens(quote)));
    envelope(
        tx,
        vec![selector("BuyToken"), addr(caller), addr(token)],
        data,
    )
}

fn sell(tx: &str, caller: u64, token: u64, amount: u64, quote: u64) -> EventEnvelope {
    let mut data = u256(tokens(amount));
    data.extend(u256(0)); // protocol fee
    data.extend(u256(0)); // creator fee
    data.push("0x0".to_string()); // timestamp
    data.extend(u256(tokens(quote)));
    envelope(
        tx,
        vec![selector("SellToken"), addr(caller), addr(token)],
        data,
    )
}

fn claim(tx: &str, owner: u64, token: u64, amount: u64) -> EventEnvelope {
    let mut data = u256(tokens(amount));
    data.push("0x0".to_string()); // timestamp
    envelope(
        tx,
        vec![selector("TokenClaimed"), addr(token), addr(owner)],
        data,
    )
}

fn liquidity_created(tx: &str, token: u64, final_price: u128) -> EventEnvelope {
    let mut keys = vec![selector("LiquidityCreated")];
    keys.extend(u256(7)); // id
    keys.push(addr(500)); // pool
    keys.push(addr(token));
    keys.push(addr(99));
    let mut data = vec![addr(1), "0x1".to_string(), "0x0".to_string()]; // owner, Ekubo, not unruggable
    data.extend(u256(final_price));
    data.extend(u256(0)); // final market cap
    envelope(tx, keys, data)
}

fn metadata_added(tx: &str, token: u64, url: &str) -> EventEnvelope {
    let mut data = vec!["0x9".to_string(), "0x0".to_string()]; // nostr_event_id = 9
    if !url.is_empty() {
        data.push(felt_hex(url.as_bytes()));
        data.push(felt_hex(url.len().to_string().as_bytes()));
    }
    envelope(tx, vec![selector("MetadataCoinAdded"), addr(token)], data)
}

#[tokio::test]
async fn buy_projects_market_position_and_ledger() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            create_launch("0xt2", 1, 10, 1000, 500),
            buy("0xt3", 2, 10, 100, 50),
        ]),
    )
    .await;

    let launch = store.launch(&addr(10)).expect("launch row");
    assert_eq!(launch.current_supply, Some(dec("900")));
    assert_eq!(launch.liquidity_raised, Some(dec("50")));
    assert_eq!(launch.total_token_holded, Some(dec("100")));
    assert_eq!(launch.price, Some(dec("0.01")));
    assert_eq!(launch.market_cap, Some(dec("10")));

    let deploy = store.deploy(&addr(10)).expect("deploy row");
    assert_eq!(deploy.is_launched, Some(true));
    assert_eq!(deploy.name.as_deref(), Some("Meme Coin"));
    assert_eq!(deploy.symbol.as_deref(), Some("MEME"));

    let position = store.shares(&addr(2), &addr(10)).expect("position row");
    assert_eq!(position.amount_owned, dec("100"));
    assert_eq!(position.amount_buy, dec("100"));
    assert_eq!(position.total_paid, dec("50"));
    assert!(position.is_claimable);

    let ledger = store.transactions();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].transfer_id, "0xt3_0");
    assert_eq!(ledger[0].transaction_type, "buy");
    assert_eq!(ledger[0].amount, Some(dec("100")));
    assert_eq!(ledger[0].quote_amount, Some(dec("50")));
    assert_eq!(ledger[0].price, Some(dec("0.01")));
    assert_eq!(ledger[0].last_price, Some(dec("0")));
    assert_eq!(ledger[0].network, "starknet-sepolia");
}

#[tokio::test]
async fn replayed_blocks_change_nothing() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    let events = block(vec![
        create_token("0xt1", 1, 10, 1000),
        create_launch("0xt2", 1, 10, 1000, 500),
        buy("0xt3", 2, 10, 100, 50),
    ]);
    service::process_block(&ctx, &events).await;
    service::process_block(&ctx, &events).await;

    let launch = store.launch(&addr(10)).expect("launch row");
    assert_eq!(launch.current_supply, Some(dec("900")));
    assert_eq!(launch.liquidity_raised, Some(dec("50")));
    let position = store.shares(&addr(2), &addr(10)).expect("position row");
    assert_eq!(position.amount_owned, dec("100"));
    assert_eq!(store.transactions().len(), 1);
}

#[tokio::test]
async fn sell_unwinds_the_buy() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            create_launch("0xt2", 1, 10, 1000, 500),
            buy("0xt3", 2, 10, 100, 50),
            sell("0xt4", 2, 10, 40, 20),
        ]),
    )
    .await;

    let launch = store.launch(&addr(10)).expect("launch row");
    assert_eq!(launch.current_supply, Some(dec("940")));
    assert_eq!(launch.liquidity_raised, Some(dec("30")));
    assert_eq!(launch.total_token_holded, Some(dec("60")));

    let position = store.shares(&addr(2), &addr(10)).expect("position row");
    assert_eq!(position.amount_owned, dec("60"));
    assert_eq!(position.amount_sell, dec("40"));
    assert_eq!(position.total_received, dec("20"));
    assert!(position.is_claimable);

    let ledger = store.transactions();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[1].transaction_type, "sell");
    // last_price carries the pre-sell spot price
    assert_eq!(ledger[1].last_price, Some(dec("0.01")));
}

#[tokio::test]
async fn trades_without_a_launch_are_skipped() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(&ctx, &block(vec![buy("0xt1", 2, 10, 100, 50)])).await;

    assert!(store.launch(&addr(10)).is_none());
    assert!(store.shares(&addr(2), &addr(10)).is_none());
    assert!(store.transactions().is_empty());
}

#[tokio::test]
async fn sell_from_unknown_shareholder_records_ledger_only() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            create_launch("0xt2", 1, 10, 1000, 500),
            sell("0xt3", 7, 10, 40, 20),
        ]),
    )
    .await;

    assert!(store.shares(&addr(7), &addr(10)).is_none());
    let ledger = store.transactions();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].transaction_type, "sell");

    // liquidity would go negative: clamped at zero
    let launch = store.launch(&addr(10)).expect("launch row");
    assert_eq!(launch.liquidity_raised, Some(dec("0")));
}

#[tokio::test]
async fn oversized_buy_clamps_supply_and_liquidity() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            create_launch("0xt2", 1, 10, 1000, 500),
            buy("0xt3", 2, 10, 2000, 900),
        ]),
    )
    .await;

    let launch = store.launch(&addr(10)).expect("launch row");
    assert_eq!(launch.current_supply, Some(dec("0")));
    assert_eq!(launch.liquidity_raised, Some(dec("500")));
    // fully sold at threshold: spot price reaches 1.0
    assert_eq!(launch.price, Some(dec("1")));
    assert_eq!(launch.market_cap, Some(dec("1000")));
}

#[tokio::test]
async fn claims_are_bounded_by_owned_shares() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            create_launch("0xt2", 1, 10, 1000, 500),
            buy("0xt3", 2, 10, 100, 50),
            claim("0xt4", 2, 10, 300), // over-claim, dropped
            claim("0xt5", 2, 10, 30),
        ]),
    )
    .await;

    let position = store.shares(&addr(2), &addr(10)).expect("position row");
    assert_eq!(position.amount_owned, dec("70"));
    assert_eq!(position.amount_claimed, dec("30"));
    assert!(position.is_claimable);

    let ledger = store.transactions();
    assert_eq!(ledger.len(), 2, "over-claim must not reach the ledger");
    assert_eq!(ledger[1].transfer_id, "0xt5_0");
    assert_eq!(ledger[1].transaction_type, "claim");
}

#[tokio::test]
async fn claim_of_full_position_clears_claimable() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            create_launch("0xt2", 1, 10, 1000, 500),
            buy("0xt3", 2, 10, 100, 50),
            claim("0xt4", 2, 10, 100),
        ]),
    )
    .await;

    let position = store.shares(&addr(2), &addr(10)).expect("position row");
    assert_eq!(position.amount_owned, dec("0"));
    assert!(!position.is_claimable);
}

#[tokio::test]
async fn liquidity_creation_freezes_final_prices() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            create_launch("0xt2", 1, 10, 1000, 500),
            liquidity_created("0xt3", 10, tokens(2)),
        ]),
    )
    .await;

    let launch = store.launch(&addr(10)).expect("launch row");
    assert_eq!(launch.is_liquidity_added, Some(true));
    assert_eq!(launch.price, Some(dec("2")));

    let ledger = store.transactions();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].transaction_type, "liquidity_created");
}

#[tokio::test]
async fn metadata_event_writes_row_and_denormalizes() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    let url = "http://127.0.0.1:1/doc";
    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            metadata_added("0xt2", 10, url),
            // replay with a different hash is deduped by token address
            metadata_added("0xt3", 10, url),
        ]),
    )
    .await;

    let row = store.metadata(&addr(10)).expect("metadata row");
    assert_eq!(row.transaction_hash, "0xt2");
    assert_eq!(row.url.as_deref(), Some(url));
    assert_eq!(row.nostr_event_id.as_deref(), Some("9"));

    let deploy = store.deploy(&addr(10)).expect("deploy row");
    assert_eq!(deploy.url.as_deref(), Some(url));
}

#[tokio::test]
async fn launch_without_deploy_is_skipped() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(&ctx, &block(vec![create_launch("0xt1", 1, 10, 1000, 500)])).await;

    assert!(store.launch(&addr(10)).is_none());
}

#[tokio::test]
async fn foreign_selectors_are_ignored() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    service::process_block(
        &ctx,
        &block(vec![envelope(
            "0xt1",
            vec![format!("0x{:x}", selector_from_name("Transfer")), addr(1)],
            vec!["0x1".to_string()],
        )]),
    )
    .await;

    assert!(store.transactions().is_empty());
}

#[tokio::test]
async fn malformed_event_does_not_poison_the_block() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(&store);

    let truncated = envelope(
        "0xbad",
        vec![selector("BuyToken"), addr(2), addr(10)],
        vec!["0x1".to_string()],
    );
    service::process_block(
        &ctx,
        &block(vec![
            create_token("0xt1", 1, 10, 1000),
            truncated,
            create_launch("0xt2", 1, 10, 1000, 500),
        ]),
    )
    .await;

    // the launch after the bad event still landed
    assert!(store.launch(&addr(10)).is_some());
}
