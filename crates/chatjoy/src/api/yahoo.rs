//! Yahoo Finance client
//!
//! Prices come through `yahoo_finance_api`; the company profile is read from
//! the quoteSummary JSON endpoint, which that crate does not cover.

use super::{CompanyProfile, HistoryRange, MarketData, PriceBar};
use crate::error::{ChatJoyError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const PROFILE_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,assetProfile";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; chatjoy/0.1)";

#[derive(Debug, Clone)]
pub struct YahooClient {
    http: Client,
}

impl YahooClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http })
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| ChatJoyError::YahooFinanceError(e.to_string()))
    }

    async fn history_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
            ChatJoyError::YahooFinanceError(format!("Invalid start timestamp: {e}"))
        })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ChatJoyError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = Self::connector()?
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| ChatJoyError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| ChatJoyError::YahooFinanceError(e.to_string()))?;

        Ok(quotes.iter().map(to_bar).collect())
    }
}

fn to_bar(q: &yahoo::Quote) -> PriceBar {
    PriceBar {
        timestamp: DateTime::from_timestamp(q.timestamp as i64, 0).unwrap_or_else(Utc::now),
        open: q.open,
        high: q.high,
        low: q.low,
        close: q.close,
        volume: q.volume,
    }
}

#[async_trait]
impl MarketData for YahooClient {
    #[instrument(skip(self))]
    async fn history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<PriceBar>> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(range.days());
        let bars = self.history_between(symbol, start, end).await?;
        debug!("Fetched {} bars for {symbol} ({range})", bars.len());
        Ok(bars)
    }

    async fn latest_quote(&self, symbol: &str) -> Result<PriceBar> {
        let response = Self::connector()?
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| ChatJoyError::YahooFinanceError(e.to_string()))?;

        let quote = response
            .last_quote()
            .map_err(|e| ChatJoyError::YahooFinanceError(e.to_string()))?;

        Ok(to_bar(&quote))
    }

    async fn validate_symbol(&self, symbol: &str) -> Result<bool> {
        match self.latest_quote(symbol).await {
            Ok(_) => Ok(true),
            Err(ChatJoyError::YahooFinanceError(reason)) => {
                debug!("{symbol} rejected by Yahoo: {reason}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let response = self
            .http
            .get(format!("{QUOTE_SUMMARY_URL}/{symbol}"))
            .query(&[("modules", PROFILE_MODULES)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatJoyError::ApiError(format!(
                "quoteSummary returned {status}: {body}"
            )));
        }

        let summary: QuoteSummaryResponse = response.json().await?;
        parse_profile(symbol, summary)
    }
}

// ============================================================================
// quoteSummary wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    default_key_statistics: Option<KeyStatistics>,
    #[serde(default)]
    asset_profile: Option<AssetProfile>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`, or `{}` when absent
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: Option<&RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default)]
    market_cap: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_high: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_low: Option<RawValue>,
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    #[serde(default)]
    price_to_book: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
}

fn parse_profile(symbol: &str, response: QuoteSummaryResponse) -> Result<CompanyProfile> {
    if let Some(error) = response.quote_summary.error.filter(|e| !e.is_null()) {
        return Err(ChatJoyError::ApiError(format!(
            "quoteSummary error for {symbol}: {error}"
        )));
    }

    let result = response
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ChatJoyError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "empty quoteSummary result".to_string(),
        })?;

    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let stats = result.default_key_statistics.unwrap_or_default();
    let asset = result.asset_profile.unwrap_or_default();

    Ok(CompanyProfile {
        name: price.short_name.or(price.long_name),
        market_cap: raw(detail.market_cap.as_ref()).or(raw(price.market_cap.as_ref())),
        fifty_two_week_high: raw(detail.fifty_two_week_high.as_ref()),
        fifty_two_week_low: raw(detail.fifty_two_week_low.as_ref()),
        sector: asset.sector.filter(|s| !s.is_empty()),
        industry: asset.industry.filter(|s| !s.is_empty()),
        trailing_pe: raw(detail.trailing_pe.as_ref()),
        price_to_book: raw(stats.price_to_book.as_ref()),
    })
}
