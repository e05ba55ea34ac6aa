//! Naver news search API client

use crate::error::{ChatJoyError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const NAVER_NEWS_URL: &str = "https://openapi.naver.com/v1/search/news.json";

/// A raw search hit; `title` may still contain `<b>` markup and entities
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaverItem {
    pub title: String,
    #[serde(default)]
    pub originallink: String,
    pub link: String,
    #[serde(default)]
    pub description: String,
    /// RFC 2822, e.g. `Mon, 03 Jun 2024 09:30:00 +0900`
    pub pub_date: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Debug, Clone)]
pub struct NaverNewsClient {
    http: Client,
    client_id: String,
    client_secret: String,
}

impl NaverNewsClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// Most recent articles for `query`, newest first
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, count: usize) -> Result<Vec<NaverItem>> {
        let response = self
            .http
            .get(NAVER_NEWS_URL)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&search_params(query, count))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatJoyError::ApiError(format!(
                "Naver search returned {status}: {body}"
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        debug!("Naver returned {} items", parsed.items.len());
        Ok(parsed.items)
    }
}

/// `display` is how Naver names the result count
fn search_params(query: &str, count: usize) -> [(&'static str, String); 3] {
    [
        ("query", query.to_string()),
        ("display", count.to_string()),
        ("sort", "date".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params() {
        let params = search_params("반도체", 5);
        assert_eq!(params[0], ("query", "반도체".to_string()));
        assert_eq!(params[1], ("display", "5".to_string()));
        assert_eq!(params[2], ("sort", "date".to_string()));
    }

    #[test]
    fn test_deserialize_search_response() {
        let body = r#"{
            "lastBuildDate":"Mon, 03 Jun 2024 10:00:00 +0900",
            "total":2,"start":1,"display":2,
            "items":[
                {"title":"<b>증권</b>사 실적 발표","originallink":"https://a.example/1",
                 "link":"https://n.news.naver.com/1","description":"...",
                 "pubDate":"Mon, 03 Jun 2024 09:30:00 +0900"},
                {"title":"코스피 &quot;반등&quot;","link":"https://n.news.naver.com/2",
                 "pubDate":"Mon, 03 Jun 2024 09:00:00 +0900"}
            ]}"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].pub_date, "Mon, 03 Jun 2024 09:30:00 +0900");
        assert!(parsed.items[1].originallink.is_empty());
    }

    #[test]
    fn test_deserialize_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }
}
