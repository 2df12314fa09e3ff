//! Error types for configuration and scripted runs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GotoPageError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid script step '{step}': {reason}")]
    InvalidStep { step: String, reason: String },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type GotoPageResult<T> = Result<T, GotoPageError>;

impl GotoPageError {
    pub fn invalid_step(step: &str, reason: impl Into<String>) -> Self {
        Self::InvalidStep {
            step: step.to_string(),
            reason: reason.into(),
        }
    }
}
