//! The stock chat bot: name in, summary plus commentary plus chart out

pub mod commands;
pub mod session;

pub use commands::Command;
pub use session::{ChatMessage, ChatRole, ChatSession};

use crate::analyst::StockAnalyst;
use crate::api::{ExchangeRateClient, MarketData, YahooClient};
use crate::chart::{render_price_chart, save_chart};
use crate::config::ChatJoyConfig;
use crate::error::Result;
use crate::format::basic_info;
use crate::snapshot::StockService;
use crate::ticker::{TickerMap, TickerResolver};
use chatjoy_llm::LLMProvider;
use chatjoy_prompt::Language;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// What the caller should do after a turn
#[derive(Debug, Clone, PartialEq)]
pub enum BotAction {
    /// Messages the bot produced this turn, possibly none
    Reply(Vec<ChatMessage>),
    Exit,
}

struct BotText {
    greeting: &'static str,
    not_found: &'static str,
    data_error: &'static str,
    analysis_header: &'static str,
    chart_caption: &'static str,
    language_changed: &'static str,
}

fn text(language: &Language) -> &'static BotText {
    const KOREAN: BotText = BotText {
        greeting: "분석할 종목명을 말씀해 주세요 (예: 삼성전자, AAPL)!",
        not_found: "❌ 종목명을 찾을 수 없습니다.",
        data_error: "⚠️ 데이터를 불러오지 못했습니다",
        analysis_header: "**🤖 AI 분석**",
        chart_caption: "주가 차트",
        language_changed: "언어가 한국어로 변경되었습니다.",
    };
    const ENGLISH: BotText = BotText {
        greeting: "Which stock should I analyze? (e.g. 삼성전자, AAPL)",
        not_found: "❌ Could not find that stock.",
        data_error: "⚠️ Could not load data",
        analysis_header: "**🤖 AI Analysis**",
        chart_caption: "price chart",
        language_changed: "Language switched to English.",
    };
    match language {
        Language::English => &ENGLISH,
        _ => &KOREAN,
    }
}

pub struct StockChatBot {
    resolver: TickerResolver,
    service: StockService,
    analyst: StockAnalyst,
    chart_dir: PathBuf,
    session: ChatSession,
}

impl StockChatBot {
    pub fn new(
        resolver: TickerResolver,
        service: StockService,
        analyst: StockAnalyst,
        chart_dir: PathBuf,
        max_history: usize,
    ) -> Self {
        let session = ChatSession::new(text(&analyst.language()).greeting, max_history);
        Self {
            resolver,
            service,
            analyst,
            chart_dir,
            session,
        }
    }

    /// Wire up Yahoo Finance, the exchange-rate client and the ticker map
    /// from `config`
    pub fn from_config(
        config: &ChatJoyConfig,
        provider: Option<Arc<dyn LLMProvider>>,
    ) -> Result<Self> {
        let market: Arc<dyn MarketData> = Arc::new(YahooClient::new(config.request_timeout)?);
        Self::with_market(config, market, provider)
    }

    /// Like [`Self::from_config`] with a caller-supplied market data source
    pub fn with_market(
        config: &ChatJoyConfig,
        market: Arc<dyn MarketData>,
        provider: Option<Arc<dyn LLMProvider>>,
    ) -> Result<Self> {
        config.validate()?;

        let map = TickerMap::load(&config.ticker_map_path)?;
        info!(
            "Loaded {} names from {}",
            map.len(),
            config.ticker_map_path.display()
        );

        let fx = ExchangeRateClient::new(
            config.exchange_rate_api_key.clone(),
            config.fallback_usd_krw,
            config.request_timeout,
        )?;
        let service = StockService::new(market.clone(), fx, config.history_range, config.currency);
        let resolver = TickerResolver::new(map, market);
        let analyst = StockAnalyst::new(provider, config)?;

        Ok(Self::new(
            resolver,
            service,
            analyst,
            config.chart_dir.clone(),
            config.max_history,
        ))
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn language(&self) -> Language {
        self.analyst.language()
    }

    /// Process one line of user input
    ///
    /// Failures become assistant messages; only `/exit` ends the conversation.
    pub async fn handle_input(&mut self, input: &str) -> BotAction {
        let input = input.trim();
        if input.is_empty() {
            return BotAction::Reply(Vec::new());
        }

        let replies = match Command::parse(input) {
            Ok(Command::Stock { query }) => self.analyze_stock(&query).await,
            Ok(Command::Help) => {
                vec![self.say(ChatMessage::assistant(Command::help_text(&self.language())))]
            }
            Ok(Command::Clear) => {
                self.session.reset(text(&self.language()).greeting);
                self.session.messages().cloned().collect()
            }
            Ok(Command::Exit) => return BotAction::Exit,
            Ok(Command::Lang { language }) => {
                self.analyst.set_language(language.clone());
                vec![self.say(ChatMessage::assistant(text(&language).language_changed))]
            }
            Err(e) => vec![self.say(ChatMessage::assistant(e.to_string()))],
        };

        BotAction::Reply(replies)
    }

    #[instrument(skip(self))]
    async fn analyze_stock(&mut self, query: &str) -> Vec<ChatMessage> {
        let text = text(&self.language());
        self.session.push(ChatMessage::user(query));

        let Some(ticker) = self.resolver.resolve(query).await else {
            return vec![self.say(ChatMessage::assistant(text.not_found))];
        };

        let snapshot = match self.service.snapshot(&ticker).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Snapshot for {ticker} failed: {e}");
                return vec![self.say(ChatMessage::assistant(format!("{}: {e}", text.data_error)))];
            }
        };

        let analysis = self.analyst.analyze(&snapshot).await;
        let summary = format!(
            "{}\n{}\n{analysis}",
            basic_info(&snapshot),
            text.analysis_header
        );

        let title = format!("{} {}", snapshot.name, text.chart_caption);
        let svg = render_price_chart(&title, &snapshot.history);
        let chart = match save_chart(&self.chart_dir, &snapshot.ticker, &svg) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Could not write chart for {ticker}: {e}");
                None
            }
        };

        vec![
            self.say(ChatMessage::assistant(summary)),
            self.say(ChatMessage::assistant(format!("📈 {title}")).with_chart(chart)),
        ]
    }

    fn say(&mut self, message: ChatMessage) -> ChatMessage {
        self.session.push(message.clone());
        message
    }
}
