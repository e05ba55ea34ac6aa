//! OpenAI chat completions provider
//!
//! Works against the public OpenAI API and against Azure OpenAI deployments.
//! The two differ only in URL layout and the authentication header:
//!
//! | flavour | endpoint | auth |
//! |---------|----------|------|
//! | OpenAI  | `{base}/chat/completions` | `Authorization: Bearer {key}` |
//! | Azure   | `{base}/openai/deployments/{model}/chat/completions?api-version={v}` | `api-key: {key}` |
//!
//! ```no_run
//! use chatjoy_llm::{CompletionRequest, LLMProvider, Message};
//! use chatjoy_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! # async fn run() -> chatjoy_llm::Result<()> {
//! let config = OpenAIConfig::azure("key", "https://my-resource.openai.azure.com");
//! let provider = OpenAIProvider::with_config(config)?;
//!
//! let request = CompletionRequest::builder("gpt-35-turbo")
//!     .add_message(Message::user("안녕하세요"))
//!     .build();
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text());
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// api-version used when Azure is selected without an explicit version
pub const DEFAULT_AZURE_API_VERSION: &str = "2023-03-15-preview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFlavor {
    OpenAI,
    Azure { api_version: String },
}

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,

    /// Base URL; for Azure this is the resource endpoint
    pub api_base: String,

    pub timeout_secs: u64,

    pub flavor: ApiFlavor,
}

impl OpenAIConfig {
    /// Public OpenAI API with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            flavor: ApiFlavor::OpenAI,
        }
    }

    /// Azure OpenAI resource, using the default api-version
    pub fn azure(api_key: impl Into<String>, resource_base: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: resource_base.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            flavor: ApiFlavor::Azure {
                api_version: DEFAULT_AZURE_API_VERSION.to_string(),
            },
        }
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_API_BASE` and `AZURE_OPENAI_API_VERSION`
    ///
    /// Setting `AZURE_OPENAI_API_VERSION` selects the Azure flavour, which
    /// then also requires `OPENAI_API_BASE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            LLMError::ConfigurationError("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        let api_base = get("OPENAI_API_BASE");

        match get("AZURE_OPENAI_API_VERSION") {
            Some(api_version) => {
                let base = api_base.ok_or_else(|| {
                    LLMError::ConfigurationError(
                        "OPENAI_API_BASE must point at the Azure resource".to_string(),
                    )
                })?;
                Ok(Self::azure(api_key, base).with_api_version(api_version))
            }
            None => {
                let config = Self::new(api_key);
                Ok(match api_base {
                    Some(base) => config.with_api_base(base),
                    None => config,
                })
            }
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Switch to the Azure flavour with the given api-version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.flavor = ApiFlavor::Azure {
            api_version: api_version.into(),
        };
        self
    }

    pub fn is_azure(&self) -> bool {
        matches!(self.flavor, ApiFlavor::Azure { .. })
    }

    /// Chat completions URL for a model (deployment name on Azure)
    pub fn endpoint(&self, model: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        match &self.flavor {
            ApiFlavor::OpenAI => format!("{base}/chat/completions"),
            ApiFlavor::Azure { api_version } => format!(
                "{base}/openai/deployments/{model}/chat/completions?api-version={api_version}"
            ),
        }
    }
}

pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LLMError::ConfigurationError(
                "API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, provider = self.name()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = self.config.endpoint(&request.model);
        debug!("Sending chat completion request to {url}");

        let body = ChatRequest {
            // Azure takes the deployment from the URL
            model: (!self.config.is_azure()).then(|| request.model.clone()),
            messages: build_chat_messages(request.system.as_deref(), &request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let builder = self.client.post(&url).json(&body);
        let builder = match self.config.flavor {
            ApiFlavor::OpenAI => builder.bearer_auth(&self.config.api_key),
            ApiFlavor::Azure { .. } => builder.header("api-key", &self.config.api_key),
        };

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(map_status_error(status.as_u16(), error_text, request.model));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

        let usage = chat.usage.unwrap_or_default();
        debug!(
            "Received response - finish_reason: {:?}, tokens: {}/{}",
            choice.finish_reason, usage.prompt_tokens, usage.completion_tokens
        );

        Ok(CompletionResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            stop_reason: map_stop_reason(choice.finish_reason.as_deref()),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            },
        })
    }

    fn name(&self) -> &'static str {
        if self.config.is_azure() {
            "azure-openai"
        } else {
            "openai"
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

fn build_chat_messages(system: Option<&str>, messages: &[Message]) -> Vec<ChatMessage> {
    let system = system.map(|text| ChatMessage {
        role: Role::System.as_str(),
        content: text.to_string(),
    });

    system
        .into_iter()
        .chain(messages.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: m.content.clone(),
        }))
        .collect()
}

fn map_status_error(status: u16, body: String, model: String) -> LLMError {
    match status {
        401 => LLMError::AuthenticationFailed,
        429 => LLMError::RateLimitExceeded(body),
        400 => LLMError::InvalidRequest(body),
        404 => LLMError::ModelNotFound(model),
        _ => LLMError::RequestFailed { status, body },
    }
}

fn map_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        Some("stop") | None => StopReason::EndTurn,
        Some(_) => StopReason::StopSequence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_openai_endpoint() {
        let config = OpenAIConfig::new("sk-test");
        assert!(!config.is_azure());
        assert_eq!(
            config.endpoint("gpt-35-turbo"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_azure_endpoint() {
        let config = OpenAIConfig::azure("key", "https://res.openai.azure.com/");
        assert_eq!(
            config.endpoint("gpt-35-turbo"),
            "https://res.openai.azure.com/openai/deployments/gpt-35-turbo/chat/completions?api-version=2023-03-15-preview"
        );
    }

    #[test]
    fn test_from_lookup_selects_flavor() {
        let openai = OpenAIConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk")])).unwrap();
        assert_eq!(openai.flavor, ApiFlavor::OpenAI);
        assert_eq!(openai.api_base, DEFAULT_OPENAI_API_BASE);

        let azure = OpenAIConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "k"),
            ("OPENAI_API_BASE", "https://res.openai.azure.com"),
            ("AZURE_OPENAI_API_VERSION", "2024-02-01"),
        ]))
        .unwrap();
        assert_eq!(
            azure.flavor,
            ApiFlavor::Azure {
                api_version: "2024-02-01".to_string()
            }
        );
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(OpenAIConfig::from_lookup(lookup(&[])).is_err());
        assert!(
            OpenAIConfig::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "k"),
                ("AZURE_OPENAI_API_VERSION", "2024-02-01"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn test_provider_name_and_empty_key() {
        let provider = OpenAIProvider::with_config(OpenAIConfig::azure("k", "https://x")).unwrap();
        assert_eq!(provider.name(), "azure-openai");
        assert!(OpenAIProvider::with_config(OpenAIConfig::new("")).is_err());
    }

    #[test]
    fn test_system_prompt_goes_first() {
        let messages = build_chat_messages(Some("주식 분석 전문가"), &[Message::user("삼성전자")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content, "삼성전자");
    }

    #[test]
    fn test_status_mapping() {
        let m = "gpt".to_string();
        assert!(matches!(
            map_status_error(401, String::new(), m.clone()),
            LLMError::AuthenticationFailed
        ));
        assert!(matches!(
            map_status_error(429, String::new(), m.clone()),
            LLMError::RateLimitExceeded(_)
        ));
        assert!(matches!(
            map_status_error(400, String::new(), m.clone()),
            LLMError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_status_error(404, String::new(), m.clone()),
            LLMError::ModelNotFound(_)
        ));
        assert!(matches!(
            map_status_error(500, "boom".to_string(), m),
            LLMError::RequestFailed { status: 500, .. }
        ));
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(map_stop_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(map_stop_reason(None), StopReason::EndTurn);
        assert_eq!(map_stop_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(
            map_stop_reason(Some("content_filter")),
            StopReason::ContentFilter
        );
    }

    #[test]
    fn test_parse_response_without_usage() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"좋아요"},"finish_reason":"stop"}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.usage.is_none());
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("좋아요"));
    }
}
