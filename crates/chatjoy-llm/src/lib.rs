//! LLM provider abstraction for chatjoy
//!
//! The bot only needs plain text chat completions, so messages carry text
//! content and a role. Providers live behind feature flags; `openai` (on by
//! default) covers both the public OpenAI API and Azure OpenAI deployments.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

pub use completion::{
    CompletionRequest, CompletionRequestBuilder, CompletionResponse, DEFAULT_MAX_TOKENS, StopReason,
    TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

#[cfg(feature = "openai")]
pub mod providers;
