//! ChatJOY terminal front end
//!
//! ```bash
//! export OPENAI_API_KEY=...
//! export NAVER_CLIENT_ID=... NAVER_CLIENT_SECRET=...
//! chatjoy                  # stock chat
//! chatjoy --currency krw   # US prices converted to won
//! chatjoy quiz
//! chatjoy news 반도체
//! chatjoy glossary PER
//! chatjoy watchlist
//! ```

mod cli;

use chatjoy::api::{MarketData, YahooClient};
use chatjoy::bot::{BotAction, ChatMessage};
use chatjoy::news::{NO_NEWS, format_articles};
use chatjoy::quiz::QuizStep;
use chatjoy::{ChatJoyConfig, Glossary, InvestorQuiz, NewsService, StockChatBot, TickerMap, Watchlist};
use chatjoy_llm::LLMProvider;
use chatjoy_llm::providers::OpenAIProvider;
use clap::Parser;
use cli::{Cli, Command};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatjoy_utils::load_dotenv();
    chatjoy_utils::init_tracing(chatjoy_utils::DEFAULT_FILTER);

    let cli = Cli::parse();
    let config = cli.config()?;
    info!(
        "Model {}, currency {:?}, language {}",
        config.model, config.currency, config.language
    );

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&config).await,
        Command::Quiz => run_quiz(),
        Command::News { query } => run_news(&config, &query).await,
        Command::Glossary { term, all } => {
            run_glossary(term.as_deref(), all);
            Ok(())
        }
        Command::Watchlist => run_watchlist(&config).await,
    }
}

/// Reads one trimmed line; `None` on end of input
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn is_exit(input: &str) -> bool {
    matches!(input, "/exit" | "/quit" | "/q" | "/종료")
}

fn llm_provider() -> Option<Arc<dyn LLMProvider>> {
    match OpenAIProvider::from_env() {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            warn!("AI commentary disabled: {e}");
            None
        }
    }
}

fn print_message(message: &ChatMessage) {
    println!("{}", message.content);
    if let Some(chart) = &message.chart {
        println!("   📎 {}", chart.display());
    }
    println!();
}

async fn run_chat(config: &ChatJoyConfig) -> anyhow::Result<()> {
    let mut bot = StockChatBot::from_config(config, llm_provider())?;
    for message in bot.session().messages() {
        print_message(message);
    }

    while let Some(input) = read_line("> ")? {
        match bot.handle_input(&input).await {
            BotAction::Reply(messages) => messages.iter().for_each(print_message),
            BotAction::Exit => break,
        }
    }
    Ok(())
}

fn run_quiz() -> anyhow::Result<()> {
    let mut quiz = InvestorQuiz::new();
    println!("📝 투자 성향 테스트\n");

    while let Some(prompt) = quiz.current_prompt() {
        println!("{prompt}\n");
        let Some(input) = read_line("숫자 1~3 입력> ")? else {
            return Ok(());
        };
        if is_exit(&input) {
            return Ok(());
        }

        match quiz.answer(&input) {
            QuizStep::Invalid(warning) => println!("{warning}\n"),
            QuizStep::Completed { message, .. } => println!("\n{message}"),
            QuizStep::Next(_) | QuizStep::AlreadyFinished => {}
        }
    }
    Ok(())
}

async fn run_news(config: &ChatJoyConfig, query: &str) -> anyhow::Result<()> {
    let service = NewsService::from_config(config)?;
    match service.search(query).await {
        Ok(articles) => println!("{}", format_articles(&articles)),
        Err(e) => {
            warn!("News search for {query} failed: {e}");
            println!("{NO_NEWS}");
        }
    }
    Ok(())
}

fn run_glossary(term: Option<&str>, all: bool) {
    let glossary = Glossary::new();

    if let Some(term) = term.filter(|t| !t.trim().is_empty()) {
        println!("{}", glossary.reply(term));
        if !all {
            return;
        }
        println!();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["용어", "설명"]);
    for (term, definition) in glossary.entries() {
        table.add_row(vec![term, definition]);
    }
    println!("📘 전체 용어 목록\n{table}");
}

fn watchlist_table(list: &Watchlist, names: &TickerMap) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "종목", "티커"]);
    for (i, name) in list.items().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            name.clone(),
            names.get(name).unwrap_or("-").to_string(),
        ]);
    }
    table
}

async fn run_watchlist(config: &ChatJoyConfig) -> anyhow::Result<()> {
    let names = TickerMap::load(&config.ticker_map_path)?;
    let market: Arc<dyn MarketData> = Arc::new(YahooClient::new(config.request_timeout)?);
    let mut list = Watchlist::new(config.watchlist_capacity);

    println!("예: 삼성전자 추가 / 카카오 삭제");
    println!("/list 목록, /show <종목명> 주가 요약, /exit 종료\n");

    while let Some(input) = read_line("> ")? {
        if input.is_empty() {
            continue;
        }
        if is_exit(&input) {
            break;
        }

        if input == "/list" {
            if list.is_empty() {
                println!("관심 종목이 없습니다.\n");
            } else {
                println!("{}\n", watchlist_table(&list, &names));
            }
        } else if let Some(name) = input.strip_prefix("/show") {
            let name = name.trim();
            let targets: Vec<String> = if name.is_empty() {
                list.items().to_vec()
            } else {
                vec![name.to_string()]
            };
            for target in targets {
                println!("{}\n", list.summary(&target, &names, market.as_ref()).await);
            }
        } else {
            for line in list.apply(&input, &names) {
                println!("{line}");
            }
            println!();
        }
    }
    Ok(())
}
