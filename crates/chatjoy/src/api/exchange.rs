//! USD/KRW exchange rate from exchangerate-api.com (v6)

use crate::error::{ChatJoyError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const EXCHANGE_RATE_BASE: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    http: Client,
    api_key: Option<String>,
    fallback: f64,
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    result: String,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

impl ExchangeRateClient {
    pub fn new(api_key: Option<String>, fallback: f64, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            fallback,
        })
    }

    /// Live KRW per USD
    pub async fn usd_krw(&self) -> Result<f64> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            ChatJoyError::ConfigError("EXCHANGE_RATE_API_KEY is not set".to_string())
        })?;

        let response = self
            .http
            .get(format!("{EXCHANGE_RATE_BASE}/{key}/latest/USD"))
            .send()
            .await?;

        let body = response.text().await?;
        let rate = parse_krw_rate(&body)?;
        debug!("USD/KRW = {rate}");
        Ok(rate)
    }

    /// Live rate, or the configured fallback when it cannot be obtained
    pub async fn usd_krw_or_fallback(&self) -> f64 {
        match self.usd_krw().await {
            Ok(rate) => rate,
            Err(e) => {
                warn!(
                    "Exchange rate unavailable ({e}), using fallback {}",
                    self.fallback
                );
                self.fallback
            }
        }
    }
}

fn parse_krw_rate(body: &str) -> Result<f64> {
    let rates: LatestRates = serde_json::from_str(body)?;

    if rates.result != "success" {
        return Err(ChatJoyError::ApiError(format!(
            "exchange rate API reported {}",
            rates.error_type.as_deref().unwrap_or(&rates.result)
        )));
    }

    rates
        .conversion_rates
        .get("KRW")
        .copied()
        .filter(|r| *r > 0.0)
        .ok_or_else(|| ChatJoyError::ApiError("KRW rate missing from response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"result":"success","base_code":"USD","conversion_rates":{"USD":1,"KRW":1385.42}}"#;
        assert!((parse_krw_rate(body).unwrap() - 1385.42).abs() < 1e-9);
    }

    #[test]
    fn test_parse_error_result() {
        let body = r#"{"result":"error","error-type":"invalid-key"}"#;
        let err = parse_krw_rate(body).unwrap_err();
        assert!(err.to_string().contains("invalid-key"));
    }

    #[test]
    fn test_parse_missing_krw() {
        let body = r#"{"result":"success","conversion_rates":{"USD":1}}"#;
        assert!(parse_krw_rate(body).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_falls_back() {
        let client = ExchangeRateClient::new(None, 1340.0, Duration::from_secs(1)).unwrap();
        assert!(client.usd_krw().await.is_err());
        assert!((client.usd_krw_or_fallback().await - 1340.0).abs() < f64::EPSILON);
    }
}
