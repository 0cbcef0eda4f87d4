//! Instagram publisher via the Facebook Graph API.
//!
//! Text goes out as a caption-only media container followed by a publish
//! call. Needs a business account id plus a Graph API token.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::Publisher;
use crate::error::PublishError;

const GRAPH_BASE: &str = "https://graph.facebook.com/v18.0";
pub const ENV_ACCESS_TOKEN: &str = "INSTAGRAM_ACCESS_TOKEN";
pub const ENV_ACCOUNT_ID: &str = "INSTAGRAM_ACCOUNT_ID";

#[derive(Clone)]
pub struct InstagramPublisher {
    token: String,
    account_id: String,
    base_url: String,
    client: Client,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ContainerResp {
    id: String,
}

impl InstagramPublisher {
    pub fn new(token: String, account_id: String) -> Self {
        Self {
            token,
            account_id,
            base_url: GRAPH_BASE.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_env() -> Option<Self> {
        let token = std::env::var(ENV_ACCESS_TOKEN).ok()?;
        let account_id = std::env::var(ENV_ACCOUNT_ID).ok()?;
        Some(Self::new(token, account_id))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, PublishError> {
        let rsp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::Transport {
                platform: self.platform(),
                source: e,
            })?;
        if !rsp.status().is_success() {
            return Err(PublishError::Rejected {
                platform: self.platform(),
                status: rsp.status().as_u16(),
            });
        }
        Ok(rsp)
    }
}

#[async_trait::async_trait]
impl Publisher for InstagramPublisher {
    async fn publish(&self, content: &str) -> Result<(), PublishError> {
        // 1) Create the media container.
        let container_url = format!("{}/{}/media", self.base_url, self.account_id);
        let rsp = self
            .post_json(
                &container_url,
                json!({ "caption": content, "access_token": self.token }),
            )
            .await?;
        let container: ContainerResp =
            rsp.json().await.map_err(|e| PublishError::Transport {
                platform: self.platform(),
                source: e,
            })?;

        // 2) Publish it.
        let publish_url = format!("{}/{}/media_publish", self.base_url, self.account_id);
        self.post_json(
            &publish_url,
            json!({ "creation_id": container.id, "access_token": self.token }),
        )
        .await?;
        Ok(())
    }

    fn platform(&self) -> &'static str {
        "instagram"
    }
}
