use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::WikiConfig;
use crate::error::ServiceError;
use crate::wiki::{ArticlePage, Encyclopedia};

const SERVICE: &str = "wikipedia";

/// MediaWiki Action API client.
pub struct WikipediaClient {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaClient {
    pub fn new(config: &WikiConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        kind: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let request = self.client.get(&self.api_url).query(params).build()?;
        tracing::info!("{kind} URL: {}", request.url());

        let resp = self.client.execute(request).await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::from_status(SERVICE, status, body));
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode {
            service: SERVICE,
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, ServiceError> {
        let limit = limit.to_string();
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("list", "search"),
            ("srsearch", term),
            ("srlimit", limit.as_str()),
        ];

        let body: SearchResponse = self.get("Search", &params).await?;
        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn fetch_page(&self, title: &str) -> Result<Option<ArticlePage>, ServiceError> {
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("prop", "extracts|categories"),
            ("explaintext", "1"),
            ("cllimit", "max"),
            ("redirects", "1"),
            ("titles", title),
        ];

        let body: PagesResponse = self.get("Content", &params).await?;
        Ok(body
            .query
            .and_then(|q| q.pages.into_iter().next())
            .and_then(ApiPage::into_article))
    }
}

// ─── Wire types (formatversion=2) ────────────────────────

#[derive(Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PagesResponse {
    query: Option<PagesQuery>,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<ApiPage>,
}

#[derive(Deserialize)]
struct ApiPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    categories: Vec<ApiCategory>,
}

#[derive(Deserialize)]
struct ApiCategory {
    title: String,
}

impl ApiPage {
    fn into_article(self) -> Option<ArticlePage> {
        if self.missing || self.invalid {
            return None;
        }
        Some(ArticlePage {
            title: self.title,
            extract: self.extract.unwrap_or_default(),
            categories: self.categories.into_iter().map(|c| c.title).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"batchcomplete":true,"query":{"searchinfo":{"totalhits":2},"search":[
            {"ns":0,"title":"Quantum entanglement","pageid":25336},
            {"ns":0,"title":"Quantum mechanics","pageid":25202}]}}"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        let titles: Vec<String> = body.query.unwrap().search.into_iter().map(|h| h.title).collect();
        assert_eq!(titles, vec!["Quantum entanglement", "Quantum mechanics"]);
    }

    #[test]
    fn test_parse_page_with_categories() {
        let json = r#"{"query":{"pages":[{"pageid":1,"ns":0,"title":"Mercury",
            "extract":"Mercury may refer to:",
            "categories":[{"ns":14,"title":"Category:Disambiguation pages"}]}]}}"#;
        let body: PagesResponse = serde_json::from_str(json).unwrap();
        let page = body.query.unwrap().pages.into_iter().next().unwrap();
        let article = page.into_article().unwrap();
        assert_eq!(article.title, "Mercury");
        assert!(article.is_disambiguation());
    }

    #[test]
    fn test_missing_page_is_none() {
        let json = r#"{"query":{"pages":[{"ns":0,"title":"Nonexistent thing","missing":true}]}}"#;
        let body: PagesResponse = serde_json::from_str(json).unwrap();
        let page = body.query.unwrap().pages.into_iter().next().unwrap();
        assert!(page.into_article().is_none());
    }

    #[test]
    fn test_page_without_extract_has_empty_body() {
        let json = r#"{"query":{"pages":[{"pageid":7,"ns":0,"title":"Stub"}]}}"#;
        let body: PagesResponse = serde_json::from_str(json).unwrap();
        let article = body.query.unwrap().pages.into_iter().next().unwrap().into_article().unwrap();
        assert!(article.extract.is_empty());
        assert!(article.categories.is_empty());
    }
}
