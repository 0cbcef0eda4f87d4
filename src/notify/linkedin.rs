//! LinkedIn publisher using the UGC posts endpoint.

use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

use super::Publisher;
use crate::error::PublishError;

const UGC_POSTS_URL: &str = "https://api.linkedin.com/v2/ugcPosts";
pub const ENV_ACCESS_TOKEN: &str = "LINKEDIN_ACCESS_TOKEN";
pub const ENV_PERSON_ID: &str = "LINKEDIN_PERSON_ID";

#[derive(Clone)]
pub struct LinkedInPublisher {
    token: String,
    person_id: String,
    endpoint: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl LinkedInPublisher {
    pub fn new(token: String, person_id: String) -> Self {
        Self {
            token,
            person_id,
            endpoint: UGC_POSTS_URL.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }

    /// Reads credentials from the environment; None when not configured so
    /// the wiring code can skip the platform instead of failing at publish.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var(ENV_ACCESS_TOKEN).ok()?;
        let person_id = std::env::var(ENV_PERSON_ID).ok()?;
        Some(Self::new(token, person_id))
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Point at a different endpoint; used by tests against a local server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn payload(&self, content: &str) -> UgcPost {
        UgcPost {
            author: format!("urn:li:person:{}", self.person_id),
            lifecycle_state: "PUBLISHED".to_string(),
            specific_content: json!({
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": content },
                    "shareMediaCategory": "NONE"
                }
            }),
            visibility: json!({
                "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"
            }),
        }
    }
}

#[derive(Serialize)]
struct UgcPost {
    author: String,
    #[serde(rename = "lifecycleState")]
    lifecycle_state: String,
    #[serde(rename = "specificContent")]
    specific_content: serde_json::Value,
    visibility: serde_json::Value,
}

#[async_trait::async_trait]
impl Publisher for LinkedInPublisher {
    async fn publish(&self, content: &str) -> Result<(), PublishError> {
        let payload = self.payload(content);

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.token)
                .header("X-Restli-Protocol-Version", "2.0.0")
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    let status = rsp.status();
                    if status.is_success() {
                        return Ok(());
                    }
                    // Server errors get the retry budget; client errors are
                    // a final rejection.
                    if status.is_server_error() && attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(PublishError::Rejected {
                        platform: self.platform(),
                        status: status.as_u16(),
                    });
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(PublishError::Transport {
                        platform: self.platform(),
                        source: e,
                    });
                }
            }
        }
    }

    fn platform(&self) -> &'static str {
        "linkedin"
    }
}
