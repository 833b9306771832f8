use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use super::{http_client, DecisionMaker};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, or empty.
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default()
    }
}

/// Google Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    // ---
    pub fn new(api_key: &str, model: &str, timeout_secs: u32) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            base_url: BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

impl DecisionMaker for GeminiClient {
    async fn decide(&self, prompt: &str) -> Result<String> {
        // ---
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let response: GenerateResponse = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to get response from Google Gemini API")?
            .error_for_status()?
            .json()
            .await
            .context("Invalid Google Gemini response")?;

        Ok(response.first_text())
    }
}
