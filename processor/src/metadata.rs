//! Best-effort off-chain metadata enrichment.
//!
//! Metadata events carry at most a URL, an IPFS hash, and an IPFS URL.
//! The resolver fetches the referenced JSON document; failure is never an
//! error for the projection, the row is simply stored without enrichment.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::retry::RetryPolicy;

/// JSON document fetched from IPFS or a direct URL. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolvedMetadata {
    pub nostr_id: Option<String>,
    pub nostr_event_id: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MetadataResolver {
    client: reqwest::Client,
    gateway: String,
    policy: RetryPolicy,
}

impl MetadataResolver {
    pub fn new(gateway: String, policy: RetryPolicy) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(policy.attempt_timeout.max(Duration::from_secs(1)))
            .build()?;
        Ok(Self {
            client,
            gateway,
            policy,
        })
    }

    /// Resolve an IPFS content hash through the configured gateway.
    pub fn gateway_url(&self, ipfs_hash: &str) -> String {
        format!("{}{}", self.gateway, ipfs_hash)
    }

    /// Try each source once in order; if all fail, retry the first source
    /// under the backoff policy. `None` means no enrichment is available.
    pub async fn resolve(&self, sources: &[String]) -> Option<ResolvedMetadata> {
        for url in sources {
            match self.fetch_json(url).await {
                Ok(document) => return Some(document),
                Err(error) => debug!(%url, %error, "metadata fetch failed"),
            }
        }

        let primary = sources.first()?;
        match self.policy.run(|| self.fetch_json(primary)).await {
            Ok(document) => Some(document),
            Err(error) => {
                warn!(url = %primary, %error, "metadata enrichment unavailable");
                None
            }
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<ResolvedMetadata, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<ResolvedMetadata>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn resolver(max_attempts: u32) -> MetadataResolver {
        MetadataResolver::new(
            "http://127.0.0.1:1/ipfs/".to_string(),
            RetryPolicy::new(
                max_attempts,
                Duration::from_millis(5),
                Duration::from_millis(500),
            ),
        )
        .expect("resolver")
    }

    async fn serve_json(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}/meta.json")
    }

    #[tokio::test]
    async fn falls_back_to_the_next_source() {
        let fallback = serve_json(r#"{"twitter":"@memecoin","description":"a coin"}"#).await;
        let sources = vec!["http://127.0.0.1:1/unreachable".to_string(), fallback];

        let resolved = resolver(2).resolve(&sources).await.expect("fallback document");
        assert_eq!(resolved.twitter.as_deref(), Some("@memecoin"));
        assert_eq!(resolved.description.as_deref(), Some("a coin"));
        assert!(resolved.nostr_id.is_none());
    }

    #[tokio::test]
    async fn unreachable_sources_resolve_to_none() {
        let sources = vec!["http://127.0.0.1:1/a".to_string()];
        assert!(resolver(2).resolve(&sources).await.is_none());
    }

    #[tokio::test]
    async fn no_sources_resolve_to_none() {
        assert!(resolver(1).resolve(&[]).await.is_none());
    }

    #[test]
    fn gateway_url_prefixes_the_hash() {
        let resolver = MetadataResolver::new(
            "https://ipfs.io/ipfs/".to_string(),
            RetryPolicy::new(1, Duration::from_millis(1), Duration::from_millis(1)),
        )
        .expect("resolver");
        assert_eq!(
            resolver.gateway_url("QmYwAP"),
            "https://ipfs.io/ipfs/QmYwAP"
        );
    }
}
