//! Slash commands understood by the chat bot

use crate::error::{ChatJoyError, Result};
use chatjoy_prompt::Language;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Anything that is not a slash command: a stock name or symbol
    Stock { query: String },
    Help,
    /// Reset the session to the greeting
    Clear,
    Exit,
    Lang { language: Language },
}

impl Command {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ChatJoyError::CommandError("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Stock {
                query: input.to_string(),
            });
        };

        let mut parts = rest.split_whitespace();
        let cmd = parts
            .next()
            .ok_or_else(|| ChatJoyError::CommandError("Empty command".to_string()))?
            .to_lowercase();

        match cmd.as_str() {
            "help" | "h" | "?" | "도움말" => Ok(Command::Help),
            "clear" | "cls" | "초기화" => Ok(Command::Clear),
            "exit" | "quit" | "q" | "종료" => Ok(Command::Exit),
            "lang" | "language" | "언어" => {
                let code = parts.next().ok_or_else(|| {
                    ChatJoyError::CommandError("Missing language for /lang (ko or en)".to_string())
                })?;
                let language = Language::from_code(code);
                if !language.is_known() {
                    return Err(ChatJoyError::CommandError(format!(
                        "Unsupported language: {code} (ko or en)"
                    )));
                }
                Ok(Command::Lang { language })
            }
            _ => Err(ChatJoyError::CommandError(format!("Unknown command: /{cmd}"))),
        }
    }

    pub fn help_text(language: &Language) -> &'static str {
        match language {
            Language::English => {
                "Type a stock name or ticker (e.g. 삼성전자, AAPL) to get a summary, AI commentary and a chart.

Commands:
  /help           Show this help
  /clear          Start over
  /lang ko|en     Switch language
  /exit           Quit"
            }
            _ => {
                "종목명이나 티커(예: 삼성전자, AAPL)를 입력하면 기본 정보, AI 분석, 차트를 보여드립니다.

명령어:
  /help (/도움말)        도움말
  /clear (/초기화)       대화 초기화
  /lang ko|en (/언어)    언어 변경
  /exit (/종료)          종료"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_stock_query() {
        assert_eq!(
            Command::parse("  삼성전자 ").unwrap(),
            Command::Stock {
                query: "삼성전자".to_string()
            }
        );
    }

    #[test]
    fn test_parse_commands_and_aliases() {
        assert_eq!(Command::parse("/help").unwrap(), Command::Help);
        assert_eq!(Command::parse("/도움말").unwrap(), Command::Help);
        assert_eq!(Command::parse("/CLEAR").unwrap(), Command::Clear);
        assert_eq!(Command::parse("/q").unwrap(), Command::Exit);
        assert_eq!(
            Command::parse("/lang en").unwrap(),
            Command::Lang {
                language: Language::English
            }
        );
        assert_eq!(
            Command::parse("/언어 한국어").unwrap(),
            Command::Lang {
                language: Language::Korean
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/lang").is_err());
        assert!(Command::parse("/lang fr").is_err());
        assert!(Command::parse("/analyze AAPL").is_err());
    }

    #[test]
    fn test_help_text_language() {
        assert!(Command::help_text(&Language::Korean).contains("/도움말"));
        assert!(Command::help_text(&Language::English).contains("Switch language"));
    }
}
