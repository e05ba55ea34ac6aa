//! Conversational watchlist of Korean stocks
//!
//! Utterances such as "삼성전자 추가" or "카카오 빼줘" are matched against
//! the known names of the ticker map.

use crate::api::{HistoryRange, MarketData};
use crate::error::{ChatJoyError, Result};
use crate::format::{format_number, format_ratio};
use crate::ticker::TickerMap;
use tracing::{debug, instrument, warn};

const REMOVE_KEYWORDS: [&str; 4] = ["삭제", "제거", "빼", "지워"];

pub const HINT: &str = "💡 종목명을 찾지 못했어요. 예: 삼성전자 추가 / 카카오 삭제";

#[derive(Debug, Clone)]
pub struct Watchlist {
    items: Vec<String>,
    capacity: usize,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Watchlist {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item == name)
    }

    /// Add or remove every known name mentioned in `utterance`
    ///
    /// Returns the reply lines in order.
    pub fn apply(&mut self, utterance: &str, names: &TickerMap) -> Vec<String> {
        let utterance = utterance.trim();
        let found = names.names_in(utterance);
        if found.is_empty() {
            return vec![HINT.to_string()];
        }

        let mut replies = Vec::with_capacity(found.len() + 1);
        if REMOVE_KEYWORDS.iter().any(|k| utterance.contains(k)) {
            for name in found {
                if let Some(pos) = self.items.iter().position(|item| *item == name) {
                    self.items.remove(pos);
                    replies.push(format!("✅ {name} 삭제되었습니다."));
                } else {
                    replies.push(format!("⚠️ {name}은(는) 등록되어 있지 않아요."));
                }
            }
        } else {
            for name in found {
                if self.contains(&name) {
                    replies.push(format!("⚠️ {name}은(는) 이미 등록되어 있어요."));
                } else if self.items.len() >= self.capacity {
                    replies.push(format!("❗ 최대 {}개까지 등록 가능합니다.", self.capacity));
                    break;
                } else {
                    replies.push(format!("✅ {name} 종목이 추가되었습니다."));
                    self.items.push(name);
                }
            }
        }

        if !self.items.is_empty() {
            replies.push(format!("📋 현재 관심 종목은 {}개입니다.", self.items.len()));
        }
        replies
    }

    /// Price summary card for a listed `name`, or a failure notice
    pub async fn summary(&self, name: &str, names: &TickerMap, market: &dyn MarketData) -> String {
        if !self.contains(name) {
            return format!("⚠️ {name}은(는) 등록되어 있지 않아요.");
        }
        match quote_summary(name, names, market).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Watchlist summary for {name} failed: {e}");
                format!("⚠️ {name} 데이터를 불러오는 데 실패했습니다.\n{e}")
            }
        }
    }
}

#[instrument(skip(names, market))]
async fn quote_summary(name: &str, names: &TickerMap, market: &dyn MarketData) -> Result<String> {
    let ticker = names
        .get(name)
        .ok_or_else(|| ChatJoyError::InvalidSymbol(name.to_string()))?;

    let (history, profile) = futures::try_join!(
        market.history(ticker, HistoryRange::OneMonth),
        market.profile(ticker)
    )?;
    debug!("{ticker}: {} bars for summary", history.len());

    let last = history.last().ok_or_else(|| ChatJoyError::DataUnavailable {
        symbol: ticker.to_string(),
        reason: "no recent prices".to_string(),
    })?;
    let change = match history.len().checked_sub(2).and_then(|i| history.get(i)) {
        Some(prev) if prev.close != 0.0 => (last.close - prev.close) / prev.close * 100.0,
        _ => 0.0,
    };
    let market_cap = profile.market_cap.unwrap_or(0.0) / 1e12;

    Ok(format!(
        "✅ **{name} 주가 요약**\n\
         - 현재가: {price}원\n\
         - 변동률: {change:.2}%\n\
         - 시가총액: {market_cap:.2}조 원\n\
         - PER: {per}, PBR: {pbr}",
        price = format_number(last.close, 0),
        per = format_ratio(profile.trailing_pe),
        pbr = format_ratio(profile.price_to_book),
    ))
}
