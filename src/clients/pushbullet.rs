use anyhow::{Context, Result};
use serde_json::json;

use super::{http_client, Notifier};

const BASE_URL: &str = "https://api.pushbullet.com/v2";

// ---

/// Sends push notes to the account's devices.
#[derive(Debug, Clone)]
pub struct PushbulletClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PushbulletClient {
    // ---
    pub fn new(api_key: &str, timeout_secs: u32) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            base_url: BASE_URL.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl Notifier for PushbulletClient {
    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        // ---
        self.http
            .post(format!("{}/pushes", self.base_url))
            .header("Access-Token", &self.api_key)
            .json(&json!({ "type": "note", "title": title, "body": body }))
            .send()
            .await
            .context("Failed to send push notification via Pushbullet API")?
            .error_for_status()
            .context("Pushbullet rejected the push")?;

        Ok(())
    }
}
