//! Concrete LLM provider implementations

mod openai;

pub use openai::{ApiFlavor, DEFAULT_AZURE_API_VERSION, OpenAIConfig, OpenAIProvider};
