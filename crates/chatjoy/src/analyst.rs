//! Natural-language commentary on a snapshot from a language model

use crate::config::ChatJoyConfig;
use crate::error::{ChatJoyError, Result};
use crate::prompts::{ANALYST_SYSTEM, ANALYZE_STOCK, register_prompts, snapshot_vars};
use crate::snapshot::StockSnapshot;
use chatjoy_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use chatjoy_prompt::{Language, PromptRegistry};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct StockAnalyst {
    provider: Option<Arc<dyn LLMProvider>>,
    prompts: PromptRegistry,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl StockAnalyst {
    /// `provider` may be `None` when no model is configured; every analysis
    /// then reports the missing configuration.
    pub fn new(provider: Option<Arc<dyn LLMProvider>>, config: &ChatJoyConfig) -> Result<Self> {
        let mut prompts = PromptRegistry::with_language(config.language.clone());
        register_prompts(&mut prompts)?;

        Ok(Self {
            provider,
            prompts,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn language(&self) -> Language {
        self.prompts.default_language()
    }

    pub fn set_language(&mut self, language: Language) {
        self.prompts.set_default_language(language);
    }

    /// Commentary text, or a failure notice in place of it
    pub async fn analyze(&self, snapshot: &StockSnapshot) -> String {
        match self.try_analyze(snapshot).await {
            Ok(text) => text,
            Err(e) => {
                warn!("AI analysis for {} failed: {e}", snapshot.ticker);
                match self.language() {
                    Language::English => format!("AI analysis failed: {e}"),
                    _ => format!("AI 분석 실패: {e}"),
                }
            }
        }
    }

    #[instrument(skip(self, snapshot), fields(ticker = %snapshot.ticker))]
    async fn try_analyze(&self, snapshot: &StockSnapshot) -> Result<String> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            LLMError::ConfigurationError("no language model configured".to_string())
        })?;

        let system = self.prompts.render(ANALYST_SYSTEM, &json!({}))?;
        let prompt = self.prompts.render(ANALYZE_STOCK, &snapshot_vars(snapshot))?;

        let request = CompletionRequest::builder(&self.model)
            .system(system)
            .add_message(Message::user(prompt))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build();

        let response = provider.complete(request).await?;
        debug!(
            "{} answered with {} tokens",
            provider.name(),
            response.usage.total()
        );

        let text = response.message.text().trim().to_string();
        if text.is_empty() {
            return Err(ChatJoyError::LlmError(LLMError::UnexpectedResponse(
                "empty completion".to_string(),
            )));
        }
        Ok(text)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubProvider;
    use super::*;
    use crate::api::CompanyProfile;
    use crate::api::testing::bars;

    fn snapshot() -> StockSnapshot {
        StockSnapshot::assemble("005930.KS", bars(&[70_000.0, 71_000.0]), CompanyProfile::default())
            .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_sends_configured_request() {
        let stub = Arc::new(StubProvider::replying("  좋은 종목입니다.  "));
        let provider: Arc<dyn LLMProvider> = stub.clone();
        let analyst = StockAnalyst::new(Some(provider), &ChatJoyConfig::default()).unwrap();

        assert_eq!(analyst.analyze(&snapshot()).await, "좋은 종목입니다.");

        let requests = stub.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "gpt-35-turbo");
        assert_eq!(request.max_tokens, 600);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.system.as_deref(), Some("주식 분석 전문가"));
        assert!(request.messages[0].text().contains("005930.KS"));
    }

    #[tokio::test]
    async fn test_analyze_failure_is_reported_inline() {
        let provider: Arc<dyn LLMProvider> = Arc::new(StubProvider::failing());
        let mut analyst = StockAnalyst::new(Some(provider), &ChatJoyConfig::default()).unwrap();
        let text = analyst.analyze(&snapshot()).await;
        assert!(text.starts_with("AI 분석 실패: "));
        assert!(text.contains("Rate limit"));

        analyst.set_language(Language::English);
        assert!(analyst.analyze(&snapshot()).await.starts_with("AI analysis failed: "));
    }

    #[tokio::test]
    async fn test_analyze_without_provider() {
        let analyst = StockAnalyst::new(None, &ChatJoyConfig::default()).unwrap();
        let text = analyst.analyze(&snapshot()).await;
        assert!(text.starts_with("AI 분석 실패: "));
        assert!(text.contains("no language model configured"));
    }

    #[tokio::test]
    async fn test_empty_completion_is_a_failure() {
        let provider: Arc<dyn LLMProvider> = Arc::new(StubProvider::replying("   "));
        let analyst = StockAnalyst::new(Some(provider), &ChatJoyConfig::default()).unwrap();
        assert!(analyst.analyze(&snapshot()).await.starts_with("AI 분석 실패"));
    }
}
