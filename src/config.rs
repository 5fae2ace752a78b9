use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_MODEL: &str = "claude-opus-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1200;
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

#[derive(Deserialize, Debug)]
pub struct Environment {
    pub anthropic_api_key: String,
}

impl Environment {
    pub fn load() -> Result<Self> {
        envy::from_env::<Environment>()
            .context("Please set your ANTHROPIC_API_KEY environment variable")
    }
}

/// Settings for the model each persona talks to.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub model: String,
    pub max_tokens: u32,
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_url: DEFAULT_API_URL.to_owned(),
        }
    }
}

impl ClientConfig {
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        toml::from_str(
            &tokio::fs::read_to_string(path)
                .await
                .context("Failed to read client config file")?,
        )
        .context("Failed to parse client config TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: ClientConfig = toml::from_str("max_tokens = 400").unwrap();
        assert_eq!(config.max_tokens, 400);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn no_path_means_defaults() {
        assert_eq!(ClientConfig::load(None).await.unwrap(), ClientConfig::default());
    }

    #[tokio::test]
    async fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "model = \"claude-sonnet-4-20250514\"\n").unwrap();

        let config = ClientConfig::load(Some(&path)).await.unwrap();
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }
}
