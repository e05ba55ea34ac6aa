//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A chat completion backend
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for the request's conversation
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name used in logs (e.g. "openai", "azure-openai")
    fn name(&self) -> &str;
}
