//! Point-in-time view of a stock: price, change, fundamentals, indicators

use crate::api::{CompanyProfile, ExchangeRateClient, HistoryRange, MarketData, PriceBar};
use crate::config::CurrencyMode;
use crate::error::{ChatJoyError, Result};
use crate::indicators::IndicatorSummary;
use crate::ticker::{Currency, Market};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub ticker: String,
    pub name: String,
    pub market: Market,
    /// Currency every price field below is expressed in
    pub currency: Currency,
    pub price: f64,
    pub previous_close: f64,
    pub change_pct: f64,
    pub market_cap: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub sector: String,
    pub industry: String,
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub indicators: IndicatorSummary,
    /// USD/KRW rate applied, if prices were converted
    pub exchange_rate: Option<f64>,
    pub history: Vec<PriceBar>,
}

impl StockSnapshot {
    /// Build from raw data in the stock's own currency
    ///
    /// Fails with `DataUnavailable` when `history` is empty.
    pub fn assemble(ticker: &str, history: Vec<PriceBar>, profile: CompanyProfile) -> Result<Self> {
        let (Some(last), Some(first)) = (history.last(), history.first()) else {
            return Err(ChatJoyError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "empty price history".to_string(),
            });
        };

        let price = last.close;
        let previous_close = history
            .len()
            .checked_sub(2)
            .map_or(price, |i| history[i].close);
        let change_pct = if previous_close == 0.0 {
            0.0
        } else {
            (price - previous_close) / previous_close * 100.0
        };

        let closes: Vec<f64> = history.iter().map(|bar| bar.close).collect();
        let (low, high) = closes
            .iter()
            .fold((first.close, first.close), |(lo, hi), &c| (lo.min(c), hi.max(c)));

        let market = Market::of(ticker);

        Ok(Self {
            ticker: ticker.to_string(),
            name: profile.name.unwrap_or_else(|| ticker.to_string()),
            market,
            currency: market.currency(),
            price,
            previous_close,
            change_pct,
            market_cap: profile.market_cap.unwrap_or(0.0),
            high_52w: profile.fifty_two_week_high.unwrap_or(high),
            low_52w: profile.fifty_two_week_low.unwrap_or(low),
            sector: profile.sector.unwrap_or_else(|| "N/A".to_string()),
            industry: profile.industry.unwrap_or_else(|| "N/A".to_string()),
            per: profile.trailing_pe,
            pbr: profile.price_to_book,
            indicators: IndicatorSummary::from_closes(&closes),
            exchange_rate: None,
            history,
        })
    }

    /// Express USD values in KRW; KRW snapshots are returned unchanged
    pub fn into_krw(mut self, usd_krw: f64) -> Self {
        if self.currency != Currency::Usd {
            return self;
        }

        let fx = |v: f64| v * usd_krw;
        self.price = fx(self.price);
        self.previous_close = fx(self.previous_close);
        self.market_cap = fx(self.market_cap);
        self.high_52w = fx(self.high_52w);
        self.low_52w = fx(self.low_52w);
        self.indicators = self.indicators.map_prices(fx);
        for bar in &mut self.history {
            bar.open = fx(bar.open);
            bar.high = fx(bar.high);
            bar.low = fx(bar.low);
            bar.close = fx(bar.close);
        }
        self.currency = Currency::Krw;
        self.exchange_rate = Some(usd_krw);
        self
    }

    /// Market cap scaled for display with its unit
    pub fn market_cap_display(&self) -> (f64, &'static str) {
        match self.currency {
            Currency::Krw => (self.market_cap / 1e12, "조 원"),
            Currency::Usd => (self.market_cap / 1e8, "억 달러"),
        }
    }
}

/// Fetches and assembles snapshots
pub struct StockService {
    market: Arc<dyn MarketData>,
    fx: ExchangeRateClient,
    range: HistoryRange,
    currency: CurrencyMode,
}

impl StockService {
    pub fn new(
        market: Arc<dyn MarketData>,
        fx: ExchangeRateClient,
        range: HistoryRange,
        currency: CurrencyMode,
    ) -> Self {
        Self {
            market,
            fx,
            range,
            currency,
        }
    }

    /// History and profile are fetched concurrently; a failed profile
    /// degrades to defaults.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, ticker: &str) -> Result<StockSnapshot> {
        let (history, profile) = futures::join!(
            self.market.history(ticker, self.range),
            self.market.profile(ticker)
        );

        let history = history?;
        let profile = profile.unwrap_or_else(|e| {
            warn!("Profile for {ticker} unavailable, using defaults: {e}");
            CompanyProfile::default()
        });

        let snapshot = StockSnapshot::assemble(ticker, history, profile)?;
        info!(
            "Snapshot {ticker}: {} bars, last close {:.2}",
            snapshot.history.len(),
            snapshot.price
        );

        match self.currency {
            CurrencyMode::Krw if snapshot.currency == Currency::Usd => {
                let rate = self.fx.usd_krw_or_fallback().await;
                Ok(snapshot.into_krw(rate))
            }
            _ => Ok(snapshot),
        }
    }
}
