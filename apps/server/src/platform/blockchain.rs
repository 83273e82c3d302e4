use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use goldwallet_core::errors::{Error as CoreError, Result as CoreResult};
use goldwallet_core::sync::BlockchainSync;
use reqwest::Client;
use serde_json::json;
use tracing::info;

/// Starts the blockchain service by notifying it over HTTP.
///
/// Without a trigger URL the start is only logged, which is what a wallet
/// without a running chain service sees.
pub struct WebhookBlockchainSync {
    client: Client,
    trigger_url: Option<String>,
}

impl WebhookBlockchainSync {
    pub fn new(trigger_url: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            trigger_url,
        }
    }
}

#[async_trait]
impl BlockchainSync for WebhookBlockchainSync {
    async fn start(&self) -> CoreResult<()> {
        let Some(url) = self.trigger_url.as_deref() else {
            info!("No sync trigger configured, blockchain sync start is log-only");
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(&json!({ "action": "start_sync", "requestedAt": Utc::now() }))
            .send()
            .await
            .map_err(|e| CoreError::SyncStart(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::SyncStart(format!(
                "trigger endpoint answered {}",
                status
            )));
        }

        info!("Blockchain sync triggered at {}", url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_posts_to_trigger() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sync")
            .match_body(mockito::Matcher::PartialJson(
                json!({ "action": "start_sync" }),
            ))
            .with_status(202)
            .create_async()
            .await;

        let sync = WebhookBlockchainSync::new(
            Some(format!("{}/sync", server.url())),
            Duration::from_secs(5),
        );
        sync.start().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_fails_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/sync")
            .with_status(503)
            .create_async()
            .await;

        let sync = WebhookBlockchainSync::new(
            Some(format!("{}/sync", server.url())),
            Duration::from_secs(5),
        );
        let err = sync.start().await.unwrap_err();
        assert!(matches!(err, CoreError::SyncStart(_)));
    }

    #[tokio::test]
    async fn test_start_without_trigger_is_ok() {
        let sync = WebhookBlockchainSync::new(None, Duration::from_secs(5));
        assert!(sync.start().await.is_ok());
    }
}
