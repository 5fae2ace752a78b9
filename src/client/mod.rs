pub(crate) mod anthropic;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One request/response exchange with a conversational model.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Model identifier recorded alongside saved transcripts.
    fn model(&self) -> &str;

    async fn reply(&self, system: &str, messages: &[Message]) -> anyhow::Result<String>;
}
