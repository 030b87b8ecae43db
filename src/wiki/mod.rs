//! Encyclopedia access: the [`Encyclopedia`] seam, its MediaWiki client, and
//! the retrying search/fetch adapters the pipeline calls.

use async_trait::async_trait;

use crate::error::ServiceError;

pub mod client;
pub mod content;
pub mod search;

/// Raw page data as returned by the encyclopedia.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePage {
    pub title: String,
    /// Plain-text body; empty when the page has no extract.
    pub extract: String,
    /// Category titles, e.g. `"Category:Disambiguation pages"`.
    pub categories: Vec<String>,
}

impl ArticlePage {
    pub fn is_disambiguation(&self) -> bool {
        self.categories
            .iter()
            .any(|c| c.to_lowercase().contains("disambiguation"))
    }
}

#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Titles matching `term`, in the engine's relevance order, at most `limit`.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, ServiceError>;

    /// Extract and categories for `title`, or `None` if the page does not exist.
    async fn fetch_page(&self, title: &str) -> Result<Option<ArticlePage>, ServiceError>;
}
