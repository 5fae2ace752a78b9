use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatClient, Message};
use crate::config::ClientConfig;

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    config: ClientConfig,
}

impl AnthropicClient {
    pub fn new(api_key: String, config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            config,
        }
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn reply(&self, system: &str, messages: &[Message]) -> Result<String> {
        let request = AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages,
        };

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "sending request to Anthropic"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?
            .error_for_status()
            .context("Anthropic API error")?;

        let api_response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        api_response
            .content
            .into_iter()
            .find_map(|content| content.text)
            .context("No text content in Anthropic response")
    }
}
