//! Error types for chatjoy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatJoyError {
    /// Remote API answered with an error status or payload
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed slash command
    #[error("Command error: {0}")]
    CommandError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    PromptError(#[from] chatjoy_prompt::PromptError),

    #[error("LLM error: {0}")]
    LlmError(#[from] chatjoy_llm::LLMError),
}

/// Result type alias for chatjoy operations
pub type Result<T> = std::result::Result<T, ChatJoyError>;
