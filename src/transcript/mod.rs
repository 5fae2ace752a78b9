use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::metrics::Metrics;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<u32>,
    pub speaker: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_turns: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

/// A saved dialogue run, as written by `converse` and read by `render`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptDocument {
    pub experiment_info: ExperimentInfo,
    pub analysis_data: Metrics,
    pub conversation_history: Vec<TurnRecord>,
    pub analysis_report: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("File '{}' not found.", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in file '{}': {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl TranscriptDocument {
    pub async fn load(path: &Path) -> Result<Self, TranscriptError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => TranscriptError::NotFound(path.to_owned()),
                _ => TranscriptError::Io {
                    path: path.to_owned(),
                    source,
                },
            })?;

        serde_json::from_str(&contents).map_err(|source| TranscriptError::InvalidJson {
            path: path.to_owned(),
            source,
        })
    }

    /// Writes the whole document in one go; non-ASCII text is kept literal.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize transcript")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
        tracing::info!(path = %path.display(), turns = self.conversation_history.len(), "transcript saved");
        Ok(())
    }
}

pub fn now_timestamp() -> String {
    Local::now().to_rfc3339()
}

pub fn default_transcript_path() -> PathBuf {
    PathBuf::from(format!(
        "claude_interaction_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}
