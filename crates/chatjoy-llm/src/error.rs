//! Errors raised while talking to a language model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// Non-success status without a more specific variant
    #[error("Request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// 401: wrong or expired key
    #[error("Authentication failed, check OPENAI_API_KEY")]
    AuthenticationFailed,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 404: unknown model, or unknown deployment on Azure
    #[error("Model or deployment not found: {0}")]
    ModelNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            LLMError::AuthenticationFailed.to_string(),
            "Authentication failed, check OPENAI_API_KEY"
        );
        assert_eq!(
            LLMError::RequestFailed {
                status: 503,
                body: "busy".to_string()
            }
            .to_string(),
            "Request failed with HTTP 503: busy"
        );
    }

}
