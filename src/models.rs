use serde::{Deserialize, Serialize};

use crate::chunking;
use crate::llm::topic::Topic;

/// A fetched, non-disambiguation article that has not been scored yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub body: String,
}

/// An article paired with its relevance score, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub title: String,
    pub body: String,
    pub score: f32,
}

impl Candidate {
    pub fn new(article: Article, score: f32) -> Self {
        Self {
            title: article.title,
            body: article.body,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// How the winning candidate relates to the acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Confident,
    BestEffort,
}

/// The selected article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleMatch {
    pub title: String,
    pub body: String,
    pub score: f32,
    pub confidence: Confidence,
}

impl ArticleMatch {
    /// First `max_chars` characters of the cleaned body, with `...` when cut short.
    pub fn preview(&self, max_chars: usize) -> String {
        chunking::preview(&chunking::clean_extract(&self.body), max_chars)
    }

    /// The cleaned body split into sentence-aligned chunks of at most `max_len` chars.
    pub fn chunks(&self, max_len: usize) -> Vec<String> {
        chunking::split_into_chunks(&chunking::clean_extract(&self.body), max_len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// Neither the refined nor the original query returned any title.
    NoPagesFound,
    /// Titles were found but none yielded usable article content.
    NoRelevantContent,
}

impl std::fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundReason::NoPagesFound => f.write_str("no pages found"),
            NotFoundReason::NoRelevantContent => f.write_str("no relevant content"),
        }
    }
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Found(ArticleMatch),
    NotFound { reason: NotFoundReason },
}

impl Outcome {
    pub fn found(&self) -> Option<&ArticleMatch> {
        match self {
            Outcome::Found(m) => Some(m),
            Outcome::NotFound { .. } => None,
        }
    }
}

/// Ask request
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub query: String,
    /// Also classify the query into a scientific topic
    #[serde(default)]
    pub classify: bool,
    /// Include the winning article split into sentence-aligned chunks
    #[serde(default)]
    pub include_chunks: bool,
}

/// Ask response
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub query: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<String>>,
}
