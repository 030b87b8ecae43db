//! Refine → search → fetch → score → select.

use std::sync::Arc;

use crate::config::Config;
use crate::llm::refine::refine_query;
use crate::llm::relevance::score_relevance;
use crate::llm::Oracle;
use crate::models::{ArticleMatch, Candidate, Confidence, NotFoundReason, Outcome};
use crate::retry::RetryPolicy;
use crate::wiki::content::fetch_article;
use crate::wiki::search::{search_titles, DEFAULT_LIMIT};
use crate::wiki::Encyclopedia;

/// Tunables for one [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub oracle_retry: RetryPolicy,
    pub wiki_retry: RetryPolicy,
    pub search_limit: usize,
    pub acceptance_threshold: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            oracle_retry: RetryPolicy::oracle_default(),
            wiki_retry: RetryPolicy::encyclopedia_default(),
            search_limit: DEFAULT_LIMIT,
            acceptance_threshold: 0.7,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            oracle_retry: config.llm.retry_policy(),
            wiki_retry: config.wiki.retry_policy(),
            search_limit: config.wiki.search_limit,
            acceptance_threshold: config.pipeline.acceptance_threshold,
        }
    }
}

/// Finds the article that best answers a question.
///
/// Holds no per-query state, so one instance can serve any number of calls.
pub struct Pipeline {
    oracle: Arc<dyn Oracle>,
    encyclopedia: Arc<dyn Encyclopedia>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        encyclopedia: Arc<dyn Encyclopedia>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            oracle,
            encyclopedia,
            settings,
        }
    }

    pub fn oracle(&self) -> &dyn Oracle {
        self.oracle.as_ref()
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub async fn find_best_article(&self, query: &str) -> Outcome {
        let refined = refine_query(self.oracle.as_ref(), &self.settings.oracle_retry, query).await;
        tracing::info!("Refined query: '{refined}'");

        let titles = self.search_with_fallback(&refined, query).await;
        if titles.is_empty() {
            return Outcome::NotFound {
                reason: NotFoundReason::NoPagesFound,
            };
        }
        tracing::info!("Wikipedia results: {titles:?}");

        let candidates = self.score_candidates(query, &titles).await;
        self.select(candidates)
    }

    async fn search_with_fallback(&self, refined: &str, query: &str) -> Vec<String> {
        let encyclopedia = self.encyclopedia.as_ref();
        let policy = &self.settings.wiki_retry;
        let limit = self.settings.search_limit;

        let titles = search_titles(encyclopedia, policy, refined, limit).await;
        if !titles.is_empty() {
            return titles;
        }

        tracing::warn!("Refined query returned no results, trying original query...");
        search_titles(encyclopedia, policy, query, limit).await
    }

    /// Fetch and score each title in search order. Titles without usable
    /// content produce no candidate.
    async fn score_candidates(&self, query: &str, titles: &[String]) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(titles.len());

        for title in titles {
            let Some(article) =
                fetch_article(self.encyclopedia.as_ref(), &self.settings.wiki_retry, title).await
            else {
                continue;
            };

            let score = score_relevance(
                self.oracle.as_ref(),
                &self.settings.oracle_retry,
                query,
                &article.title,
                &article.body,
            )
            .await;
            tracing::info!("'{}' - relevance: {score:.2}", article.title);

            candidates.push(Candidate::new(article, score));
        }

        candidates
    }

    fn select(&self, mut candidates: Vec<Candidate>) -> Outcome {
        // Stable: equal scores keep search-engine order.
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let Some(best) = candidates.into_iter().next() else {
            return Outcome::NotFound {
                reason: NotFoundReason::NoRelevantContent,
            };
        };

        let confidence = if best.score >= self.settings.acceptance_threshold {
            tracing::info!("Best match: '{}' (score: {:.2})", best.title, best.score);
            Confidence::Confident
        } else {
            tracing::warn!(
                "No highly relevant matches. Using best available: '{}' (score: {:.2})",
                best.title,
                best.score
            );
            Confidence::BestEffort
        };

        Outcome::Found(ArticleMatch {
            title: best.title,
            body: best.body,
            score: best.score,
            confidence,
        })
    }
}
