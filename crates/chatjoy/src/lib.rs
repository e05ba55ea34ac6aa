//! ChatJOY: a conversational stock assistant
//!
//! The user names a stock ("삼성전자", "AAPL"); the bot resolves the ticker,
//! pulls a year of daily prices plus a company profile, computes moving
//! averages and RSI, asks a language model for commentary and renders a price
//! chart. Around that sit a few small conversational tools: an investor
//! profile quiz, a glossary of stock terms, a watchlist and a news search.
//!
//! Every tool keeps its state in a plain struct owned by the caller, one per
//! conversation.

pub mod analyst;
pub mod api;
pub mod bot;
pub mod chart;
pub mod config;
pub mod error;
pub mod format;
pub mod glossary;
pub mod indicators;
pub mod news;
pub mod prompts;
pub mod quiz;
pub mod snapshot;
pub mod ticker;
pub mod watchlist;

pub use analyst::StockAnalyst;
pub use api::{CompanyProfile, HistoryRange, MarketData, PriceBar};
pub use bot::{BotAction, StockChatBot};
pub use config::{ChatJoyConfig, CurrencyMode};
pub use error::{ChatJoyError, Result};
pub use glossary::Glossary;
pub use indicators::IndicatorSummary;
pub use news::NewsService;
pub use quiz::InvestorQuiz;
pub use snapshot::{StockService, StockSnapshot};
pub use ticker::{Currency, Market, TickerMap, TickerResolver};
pub use watchlist::Watchlist;
