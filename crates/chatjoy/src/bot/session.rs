//! Per-conversation message history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Rendered chart file attached to this message
    pub chart: Option<PathBuf>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            chart: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            chart: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_chart(mut self, chart: Option<PathBuf>) -> Self {
        self.chart = chart;
        self
    }
}

/// Bounded message history, oldest messages dropped first
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: VecDeque<ChatMessage>,
    max_history: usize,
}

impl ChatSession {
    pub fn new(greeting: &str, max_history: usize) -> Self {
        let mut session = Self {
            messages: VecDeque::with_capacity(max_history.min(64)),
            max_history: max_history.max(1),
        };
        session.push(ChatMessage::assistant(greeting));
        session
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.max_history {
            self.messages.pop_front();
        }
    }

    /// Drop everything and start again from `greeting`
    pub fn reset(&mut self, greeting: &str) {
        self.messages.clear();
        self.push(ChatMessage::assistant(greeting));
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_greeting() {
        let session = ChatSession::new("안녕하세요", 10);
        assert_eq!(session.len(), 1);
        let first = session.last().unwrap();
        assert_eq!(first.role, ChatRole::Assistant);
        assert_eq!(first.content, "안녕하세요");
    }

    #[test]
    fn test_history_is_capped() {
        let mut session = ChatSession::new("greeting", 3);
        for i in 0..5 {
            session.push(ChatMessage::user(format!("msg {i}")));
        }
        let contents: Vec<&str> = session.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn test_reset() {
        let mut session = ChatSession::new("hi", 10);
        session.push(ChatMessage::user("AAPL"));
        session.push(ChatMessage::assistant("chart").with_chart(Some(PathBuf::from("a.svg"))));
        session.reset("hi again");
        assert_eq!(session.len(), 1);
        assert_eq!(session.last().unwrap().content, "hi again");
        assert!(session.last().unwrap().chart.is_none());
    }
}
