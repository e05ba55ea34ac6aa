//! Runtime configuration
//!
//! Defaults cover everything except credentials. [`ChatJoyConfig::from_env`]
//! layers environment variables (and a `.env` file, if loaded by the caller)
//! on top of the defaults.

use crate::api::HistoryRange;
use crate::error::{ChatJoyError, Result};
use chatjoy_prompt::Language;
use chatjoy_utils::{var_opt, var_parse};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// How prices of foreign stocks are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurrencyMode {
    /// In the stock's own currency
    #[default]
    Native,
    /// USD values converted to KRW
    Krw,
}

impl FromStr for CurrencyMode {
    type Err = ChatJoyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "native" | "original" => Ok(Self::Native),
            "krw" | "won" | "원화" => Ok(Self::Krw),
            other => Err(ChatJoyError::ConfigError(format!(
                "Unknown currency mode '{other}' (expected native or krw)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatJoyConfig {
    /// JSON file mapping Korean stock names to Yahoo tickers
    pub ticker_map_path: PathBuf,

    /// Directory SVG charts are written to
    pub chart_dir: PathBuf,

    pub currency: CurrencyMode,

    pub language: Language,

    /// Price history window used for snapshots
    pub history_range: HistoryRange,

    pub exchange_rate_api_key: Option<String>,

    /// USD/KRW rate used when the live rate is unavailable
    pub fallback_usd_krw: f64,

    pub naver_client_id: Option<String>,

    pub naver_client_secret: Option<String>,

    /// Number of news articles requested per search
    pub news_display: usize,

    /// Model name, or deployment name on Azure
    pub model: String,

    pub temperature: f32,

    pub max_tokens: usize,

    pub watchlist_capacity: usize,

    /// Messages kept in a chat session
    pub max_history: usize,

    pub request_timeout: Duration,
}

impl Default for ChatJoyConfig {
    fn default() -> Self {
        Self {
            ticker_map_path: PathBuf::from("data/krx_ticker_map.json"),
            chart_dir: PathBuf::from("charts"),
            currency: CurrencyMode::Native,
            language: Language::Korean,
            history_range: HistoryRange::OneYear,
            exchange_rate_api_key: None,
            fallback_usd_krw: 1340.0,
            naver_client_id: None,
            naver_client_secret: None,
            news_display: 5,
            model: "gpt-35-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 600,
            watchlist_capacity: 10,
            max_history: 100,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ChatJoyConfig {
    pub fn builder() -> ChatJoyConfigBuilder {
        ChatJoyConfigBuilder::default()
    }

    /// Defaults overridden by `CHATJOY_*` and service credential variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(ChatJoyError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatJoyError::ConfigError(format!(
                "temperature must be within 0..=2, got {}",
                self.temperature
            )));
        }

        if self.watchlist_capacity == 0 {
            return Err(ChatJoyError::ConfigError(
                "watchlist_capacity must be greater than 0".to_string(),
            ));
        }

        if self.fallback_usd_krw <= 0.0 {
            return Err(ChatJoyError::ConfigError(
                "fallback_usd_krw must be positive".to_string(),
            ));
        }

        if self.news_display == 0 || self.news_display > 100 {
            return Err(ChatJoyError::ConfigError(
                "news_display must be within 1..=100".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ChatJoyError::ConfigError("model must not be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ChatJoyConfigBuilder {
    ticker_map_path: Option<PathBuf>,
    chart_dir: Option<PathBuf>,
    currency: Option<CurrencyMode>,
    language: Option<Language>,
    history_range: Option<HistoryRange>,
    exchange_rate_api_key: Option<String>,
    fallback_usd_krw: Option<f64>,
    naver_client_id: Option<String>,
    naver_client_secret: Option<String>,
    news_display: Option<usize>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    watchlist_capacity: Option<usize>,
    max_history: Option<usize>,
    request_timeout: Option<Duration>,
}

impl ChatJoyConfigBuilder {
    pub fn ticker_map_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ticker_map_path = Some(path.into());
        self
    }

    pub fn chart_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chart_dir = Some(dir.into());
        self
    }

    pub fn currency(mut self, mode: CurrencyMode) -> Self {
        self.currency = Some(mode);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn history_range(mut self, range: HistoryRange) -> Self {
        self.history_range = Some(range);
        self
    }

    pub fn exchange_rate_api_key(mut self, key: impl Into<String>) -> Self {
        self.exchange_rate_api_key = Some(key.into());
        self
    }

    pub fn fallback_usd_krw(mut self, rate: f64) -> Self {
        self.fallback_usd_krw = Some(rate);
        self
    }

    pub fn naver_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.naver_client_id = Some(client_id.into());
        self.naver_client_secret = Some(client_secret.into());
        self
    }

    pub fn news_display(mut self, display: usize) -> Self {
        self.news_display = Some(display);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn watchlist_capacity(mut self, capacity: usize) -> Self {
        self.watchlist_capacity = Some(capacity);
        self
    }

    pub fn max_history(mut self, max_history: usize) -> Self {
        self.max_history = Some(max_history);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Fill unset fields from the environment
    ///
    /// Values already set on the builder win over the environment.
    pub fn with_env(mut self) -> Self {
        self.ticker_map_path = self
            .ticker_map_path
            .or_else(|| var_opt("CHATJOY_TICKER_MAP").map(PathBuf::from));
        self.chart_dir = self
            .chart_dir
            .or_else(|| var_opt("CHATJOY_CHART_DIR").map(PathBuf::from));
        self.currency = self.currency.or_else(|| var_parse("CHATJOY_CURRENCY"));
        self.language = self
            .language
            .or_else(|| var_opt("CHATJOY_LANGUAGE").map(|v| Language::from_code(&v)));
        self.history_range = self
            .history_range
            .or_else(|| var_parse("CHATJOY_HISTORY_RANGE"));
        self.exchange_rate_api_key = self
            .exchange_rate_api_key
            .or_else(|| var_opt("EXCHANGE_RATE_API_KEY"));
        self.naver_client_id = self.naver_client_id.or_else(|| var_opt("NAVER_CLIENT_ID"));
        self.naver_client_secret = self
            .naver_client_secret
            .or_else(|| var_opt("NAVER_CLIENT_SECRET"));
        self.model = self.model.or_else(|| var_opt("OPENAI_MODEL"));
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ChatJoyConfig> {
        let defaults = ChatJoyConfig::default();

        let config = ChatJoyConfig {
            ticker_map_path: self.ticker_map_path.unwrap_or(defaults.ticker_map_path),
            chart_dir: self.chart_dir.unwrap_or(defaults.chart_dir),
            currency: self.currency.unwrap_or(defaults.currency),
            language: self.language.unwrap_or(defaults.language),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            exchange_rate_api_key: self.exchange_rate_api_key,
            fallback_usd_krw: self.fallback_usd_krw.unwrap_or(defaults.fallback_usd_krw),
            naver_client_id: self.naver_client_id,
            naver_client_secret: self.naver_client_secret,
            news_display: self.news_display.unwrap_or(defaults.news_display),
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            watchlist_capacity: self
                .watchlist_capacity
                .unwrap_or(defaults.watchlist_capacity),
            max_history: self.max_history.unwrap_or(defaults.max_history),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChatJoyConfig::default();
        assert_eq!(config.currency, CurrencyMode::Native);
        assert_eq!(config.language, Language::Korean);
        assert_eq!(config.history_range, HistoryRange::OneYear);
        assert_eq!(config.model, "gpt-35-turbo");
        assert_eq!(config.max_tokens, 600);
        assert_eq!(config.watchlist_capacity, 10);
        assert!((config.fallback_usd_krw - 1340.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ChatJoyConfig::builder()
            .currency(CurrencyMode::Krw)
            .language(Language::English)
            .watchlist_capacity(3)
            .chart_dir("/tmp/charts")
            .build()
            .unwrap();

        assert_eq!(config.currency, CurrencyMode::Krw);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.watchlist_capacity, 3);
        assert_eq!(config.chart_dir, PathBuf::from("/tmp/charts"));
    }

    #[test]
    fn test_validation_failures() {
        assert!(ChatJoyConfig::builder().max_tokens(0).build().is_err());
        assert!(ChatJoyConfig::builder().temperature(2.5).build().is_err());
        assert!(ChatJoyConfig::builder().watchlist_capacity(0).build().is_err());
        assert!(ChatJoyConfig::builder().fallback_usd_krw(0.0).build().is_err());
        assert!(ChatJoyConfig::builder().news_display(0).build().is_err());
        assert!(ChatJoyConfig::builder().model("  ").build().is_err());
    }

    #[test]
    fn test_builder_wins_over_env() {
        unsafe {
            std::env::set_var("CHATJOY_CHART_DIR", "from-env");
        }
        let config = ChatJoyConfig::builder()
            .chart_dir("from-builder")
            .with_env()
            .build()
            .unwrap();
        assert_eq!(config.chart_dir, PathBuf::from("from-builder"));
        unsafe {
            std::env::remove_var("CHATJOY_CHART_DIR");
        }
    }

    #[test]
    fn test_currency_mode_parse() {
        assert_eq!("KRW".parse::<CurrencyMode>().unwrap(), CurrencyMode::Krw);
        assert_eq!(
            "native".parse::<CurrencyMode>().unwrap(),
            CurrencyMode::Native
        );
        assert!("eur".parse::<CurrencyMode>().is_err());
    }
}
