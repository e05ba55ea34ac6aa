//! Stock name to ticker resolution
//!
//! Korean listings are looked up in a static name map (`krx_ticker_map.json`,
//! `{"삼성전자": "005930.KS", ...}`). Anything else is treated as a symbol
//! typed directly by the user and confirmed with the data provider.

use crate::api::MarketData;
use crate::error::{ChatJoyError, Result};
use regex::Regex;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static SYMBOL_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9.^=\-]{1,15}$").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    Kospi,
    Kosdaq,
    Us,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Krw,
    Usd,
}

impl Market {
    /// Market implied by the ticker suffix
    pub fn of(ticker: &str) -> Self {
        let upper = ticker.to_ascii_uppercase();
        if upper.ends_with(".KS") {
            Self::Kospi
        } else if upper.ends_with(".KQ") {
            Self::Kosdaq
        } else {
            Self::Us
        }
    }

    pub fn is_korean(self) -> bool {
        matches!(self, Self::Kospi | Self::Kosdaq)
    }

    pub fn currency(self) -> Currency {
        if self.is_korean() {
            Currency::Krw
        } else {
            Currency::Usd
        }
    }
}

/// Name to ticker map that remembers file order
#[derive(Debug, Clone, Default)]
pub struct TickerMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    lowercase_index: HashMap<String, usize>,
}

struct OrderedEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object of stock name to ticker")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, ticker)) = map.next_entry::<String, String>()? {
                    entries.push((name, ticker));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl TickerMap {
    pub fn from_entries<I, N, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let mut map = Self::default();
        for (name, ticker) in entries {
            map.insert(name.into(), ticker.into());
        }
        map
    }

    fn insert(&mut self, name: String, ticker: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            return;
        }
        if let Some(&pos) = self.index.get(&name) {
            self.entries[pos].1 = ticker;
            return;
        }
        let pos = self.entries.len();
        self.index.insert(name.clone(), pos);
        self.lowercase_index.entry(name.to_lowercase()).or_insert(pos);
        self.entries.push((name, ticker));
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let OrderedEntries(entries) = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Load the map; a missing file yields an empty map with a warning
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let map = Self::from_json(&json).map_err(|e| {
                    ChatJoyError::ConfigError(format!("{}: {e}", path.display()))
                })?;
                info!("Loaded {} ticker names from {}", map.len(), path.display());
                Ok(map)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "{} not found, Korean stock names will not resolve",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact match first, then case-insensitive
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.index
            .get(name)
            .or_else(|| self.lowercase_index.get(&name.to_lowercase()))
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Every known name contained in `utterance`, in map order
    pub fn names_in(&self, utterance: &str) -> Vec<String> {
        self.names()
            .filter(|name| utterance.contains(name))
            .map(ToString::to_string)
            .collect()
    }
}

/// Whether `symbol` looks like an exchange ticker (`AAPL`, `005930.KS`, `^KS11`)
pub fn looks_like_symbol(symbol: &str) -> bool {
    SYMBOL_SHAPE
        .as_ref()
        .is_some_and(|shape| shape.is_match(symbol))
}

pub struct TickerResolver {
    map: TickerMap,
    market: Arc<dyn MarketData>,
}

impl TickerResolver {
    pub fn new(map: TickerMap, market: Arc<dyn MarketData>) -> Self {
        Self { map, market }
    }

    pub fn map(&self) -> &TickerMap {
        &self.map
    }

    /// Resolve a user-typed name or symbol, `None` when nothing matches
    pub async fn resolve(&self, input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some(ticker) = self.map.get(input) {
            debug!("{input} -> {ticker} (name map)");
            return Some(ticker.to_string());
        }

        let symbol = input.to_uppercase();
        if !looks_like_symbol(&symbol) {
            debug!("{input} is neither a known name nor a ticker");
            return None;
        }

        match self.market.validate_symbol(&symbol).await {
            Ok(true) => Some(symbol),
            Ok(false) => None,
            Err(e) => {
                warn!("Could not validate {symbol}: {e}");
                None
            }
        }
    }
}
