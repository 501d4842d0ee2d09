use std::{env, error::Error, sync::Arc, time::Duration};

use indexer_db::{
    entity::{indexer_cursor::IndexerCursor, raw_block::RawBlock},
    initialize_database,
};
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use processor::{
    handlers::HandlerContext,
    metadata::MetadataResolver,
    retry::RetryPolicy,
    service,
    store::PgStore,
    stream::Block,
};

mod defaults {
    pub const POLL_INTERVAL: &str = "5";
    pub const BATCH_SIZE: &str = "25";
    pub const NETWORK: &str = "starknet-sepolia";
    pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
    pub const STREAM_KEY: &str = "launchpad";
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "processor=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting launchpad processor");

    let db_pool = initialize_database().await?;
    info!("database connection established");

    let poll_interval = env::var("POLL_INTERVAL")
        .unwrap_or(String::from(defaults::POLL_INTERVAL))
        .parse::<u64>()?;
    let batch_size = env::var("BATCH_SIZE")
        .unwrap_or(String::from(defaults::BATCH_SIZE))
        .parse::<i32>()?;
    let network = env::var("NETWORK").unwrap_or(String::from(defaults::NETWORK));
    let gateway = env::var("IPFS_GATEWAY").unwrap_or(String::from(defaults::IPFS_GATEWAY));

    let resolver = MetadataResolver::new(
        gateway,
        RetryPolicy::new(3, Duration::from_secs(1), Duration::from_secs(1)),
    )?;
    let ctx = HandlerContext {
        store: Arc::new(PgStore::new(db_pool.clone())),
        metadata: resolver,
        network,
    };

    let cursor = IndexerCursor::find_or_create(defaults::STREAM_KEY, &db_pool).await?;
    info!(
        last_order_key = cursor.last_order_key,
        "resuming from committed cursor"
    );

    let idle = Duration::from_secs(poll_interval);
    loop {
        let batch = match RawBlock::find_batch(batch_size, &db_pool).await {
            Ok(batch) => batch,
            Err(fetch_error) => {
                error!(error = %fetch_error, "failed to read the block queue");
                sleep(idle).await;
                continue;
            }
        };

        if batch.is_empty() {
            sleep(idle).await;
            continue;
        }

        info!(blocks = batch.len(), "draining block queue");
        for raw in batch {
            match serde_json::from_str::<Block>(&raw.payload) {
                Ok(block) => service::process_block(&ctx, &block).await,
                // poison payloads are dropped, not retried forever
                Err(parse_error) => warn!(
                    order_key = raw.order_key,
                    error = %parse_error,
                    "dropping undecodable block payload"
                ),
            }

            if let Err(delete_error) = RawBlock::delete(raw.id, &db_pool).await {
                error!(id = raw.id, error = %delete_error, "failed to dequeue block");
            }
            if let Err(cursor_error) =
                IndexerCursor::advance(defaults::STREAM_KEY, raw.order_key, &db_pool).await
            {
                error!(
                    order_key = raw.order_key,
                    error = %cursor_error,
                    "failed to advance cursor"
                );
            }
        }
    }
}
