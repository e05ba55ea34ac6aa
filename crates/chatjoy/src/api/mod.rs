//! External data sources
//!
//! - [`yahoo`]: price history and company profiles from Yahoo Finance
//! - [`exchange`]: USD/KRW rate from exchangerate-api.com
//! - [`naver`]: Naver news search

pub mod exchange;
pub mod naver;
pub mod yahoo;

pub use exchange::ExchangeRateClient;
pub use naver::{NaverItem, NaverNewsClient};
pub use yahoo::YahooClient;

use crate::error::{ChatJoyError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Company fundamentals; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub market_cap: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    /// Trailing P/E (PER)
    pub trailing_pe: Option<f64>,
    /// Price to book (PBR)
    pub price_to_book: Option<f64>,
}

/// Lookback window for price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
}

impl HistoryRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
        }
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryRange {
    type Err = ChatJoyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            other => Err(ChatJoyError::ConfigError(format!(
                "Invalid range: {other} (expected 1mo, 3mo, 6mo, 1y, 2y or 5y)"
            ))),
        }
    }
}

/// Source of prices and fundamentals
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily bars over `range`, oldest first
    async fn history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<PriceBar>>;

    async fn latest_quote(&self, symbol: &str) -> Result<PriceBar>;

    /// Whether the provider knows the symbol
    async fn validate_symbol(&self, symbol: &str) -> Result<bool>;

    async fn profile(&self, symbol: &str) -> Result<CompanyProfile>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::PriceBar;
    use chrono::{Duration, TimeZone, Utc};

    /// Daily bars with the given closes starting 2024-01-02
    pub fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single().unwrap_or_default();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 1_000,
            })
            .collect()
    }
}
