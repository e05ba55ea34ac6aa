//! Latest news headlines from Naver search

use crate::api::{NaverItem, NaverNewsClient};
use crate::config::ChatJoyConfig;
use crate::error::{ChatJoyError, Result};
use chrono::DateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{info, instrument};

pub const DEFAULT_QUERY: &str = "증권";
pub const NO_NEWS: &str = "뉴스를 불러오지 못했습니다.";

static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

const ENTITIES: [(&str, &str); 6] = [
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Remove markup such as `<b>` and decode the common entities
pub fn strip_html(text: &str) -> String {
    let stripped = match HTML_TAG.as_ref() {
        Some(tag) => tag.replace_all(text, ""),
        None => text.into(),
    };
    // &amp; last so "&amp;lt;" stays "&lt;"
    ENTITIES
        .iter()
        .fold(stripped.into_owned(), |acc, (entity, plain)| acc.replace(entity, plain))
}

/// `Mon, 03 Jun 2024 09:30:00 +0900` -> `2024-06-03 09:30`, keeping the
/// publisher's local time; unparseable dates are passed through
pub fn format_pub_date(raw: &str) -> String {
    DateTime::parse_from_rfc2822(raw.trim()).map_or_else(
        |_| raw.trim().to_string(),
        |date| date.format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub link: String,
    pub published: String,
}

impl From<NaverItem> for NewsArticle {
    fn from(item: NaverItem) -> Self {
        Self {
            title: strip_html(&item.title),
            link: item.link,
            published: format_pub_date(&item.pub_date),
        }
    }
}

impl NewsArticle {
    pub fn to_markdown(&self) -> String {
        format!("🕒 **{}**\n\n🔗 [{}]({})", self.published, self.title, self.link)
    }
}

/// One block per article, or the "no news" notice
pub fn format_articles(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return NO_NEWS.to_string();
    }
    articles
        .iter()
        .map(NewsArticle::to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct NewsService {
    client: NaverNewsClient,
    display: usize,
}

impl NewsService {
    pub fn new(client: NaverNewsClient, display: usize) -> Self {
        Self { client, display }
    }

    /// Fails when the Naver client id or secret is not configured
    pub fn from_config(config: &ChatJoyConfig) -> Result<Self> {
        let (Some(id), Some(secret)) = (&config.naver_client_id, &config.naver_client_secret)
        else {
            return Err(ChatJoyError::ConfigError(
                "NAVER_CLIENT_ID and NAVER_CLIENT_SECRET must be set for news search".to_string(),
            ));
        };
        let client = NaverNewsClient::new(id.clone(), secret.clone(), config.request_timeout)?;
        Ok(Self::new(client, config.news_display))
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<NewsArticle>> {
        let query = match query.trim() {
            "" => DEFAULT_QUERY,
            q => q,
        };
        let items = self.client.search(query, self.display).await?;
        info!("{} articles for {query}", items.len());
        Ok(items.into_iter().map(NewsArticle::from).collect())
    }
}
