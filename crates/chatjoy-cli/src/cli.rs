//! Command-line arguments

use chatjoy::{ChatJoyConfig, CurrencyMode};
use chatjoy_prompt::Language;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chatjoy", version, about = "주식 챗봇 ChatJOY", long_about = None)]
pub struct Cli {
    /// Show prices in the stock's own currency or converted to KRW
    #[arg(long, value_name = "native|krw")]
    pub currency: Option<String>,

    /// Language for AI commentary and bot messages
    #[arg(long, value_name = "ko|en")]
    pub lang: Option<String>,

    /// Path of the name-to-ticker JSON map
    #[arg(long, value_name = "FILE")]
    pub ticker_map: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(long, value_name = "DIR")]
    pub chart_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask about a stock by name or ticker (default)
    Chat,
    /// Investor-profile quiz
    Quiz,
    /// Latest news from Naver
    News {
        /// Search keyword
        #[arg(default_value = chatjoy::news::DEFAULT_QUERY)]
        query: String,
    },
    /// Explain a stock term
    Glossary {
        term: Option<String>,
        /// List every term
        #[arg(long)]
        all: bool,
    },
    /// Manage a watchlist in plain sentences ("삼성전자 추가")
    Watchlist,
}

impl Cli {
    /// Flags first, then environment variables, then defaults
    pub fn config(&self) -> anyhow::Result<ChatJoyConfig> {
        let mut builder = ChatJoyConfig::builder();

        if let Some(currency) = &self.currency {
            builder = builder.currency(currency.parse::<CurrencyMode>()?);
        }
        if let Some(lang) = &self.lang {
            let language = Language::from_code(lang);
            if !language.is_known() {
                anyhow::bail!("Unsupported language '{lang}' (expected ko or en)");
            }
            builder = builder.language(language);
        }
        if let Some(path) = &self.ticker_map {
            builder = builder.ticker_map_path(path.clone());
        }
        if let Some(dir) = &self.chart_dir {
            builder = builder.chart_dir(dir.clone());
        }

        Ok(builder.with_env().build()?)
    }
}
