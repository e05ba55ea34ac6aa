//! Language selection for prompts and bot replies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages a template variant can be written in
///
/// ```
/// use chatjoy_prompt::Language;
///
/// assert_eq!(Language::from_code("ko"), Language::Korean);
/// assert_eq!(Language::from_code("한국어"), Language::Korean);
/// assert_eq!(Language::from_code("EN"), Language::English);
/// assert_eq!(Language::Korean.code(), "ko");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    Korean,
    English,
    /// Any other ISO 639-1 code
    Other(String),
}

impl Language {
    pub fn code(&self) -> &str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
            Language::Other(code) => code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Language::Korean => "Korean",
            Language::English => "English",
            Language::Other(code) => code,
        }
    }

    /// Parse from an ISO 639-1 code or a common name
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ko" | "kr" | "korean" | "한국어" | "ko-kr" => Language::Korean,
            "en" | "english" | "영어" | "en-us" => Language::English,
            other => Language::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Other(_))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}
