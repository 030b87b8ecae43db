use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::chunking::CHUNK_CHARS;
use crate::llm::topic::classify_topic;
use crate::models::{AskRequest, AskResponse};
use crate::pipeline::Pipeline;
use crate::state::AppState;

/// Maximum accepted question length in characters.
const MAX_QUERY_LEN: usize = 1_000;

/// POST /api/ask - Find the Wikipedia article that best answers a question:
///   1. Refine the question into a search term (LLM)
///   2. Search Wikipedia, retrying with the raw question if nothing matches
///   3. Fetch each result and score it against the question (LLM)
///   4. Return the top-scoring article, or the reason nothing was found
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Query exceeds {MAX_QUERY_LEN} characters"),
        ));
    }

    let _permit = state
        .ask_semaphore
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Ask service is shutting down".to_string(),
            )
        })?;

    let req = AskRequest {
        query: query.to_string(),
        ..req
    };
    Ok(Json(answer(&state.pipeline, &req).await))
}

/// Run the pipeline for one request, plus the optional extras it asks for.
pub async fn answer(pipeline: &Pipeline, req: &AskRequest) -> AskResponse {
    let topic = if req.classify {
        let policy = &pipeline.settings().oracle_retry;
        Some(classify_topic(pipeline.oracle(), policy, &req.query).await)
    } else {
        None
    };

    let outcome = pipeline.find_best_article(&req.query).await;

    let chunks = if req.include_chunks {
        outcome.found().map(|m| m.chunks(CHUNK_CHARS))
    } else {
        None
    };

    AskResponse {
        query: req.query.clone(),
        outcome,
        topic,
        chunks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ServiceError;
    use crate::llm::Oracle;
    use crate::models::Outcome;
    use crate::pipeline::PipelineSettings;
    use crate::wiki::{ArticlePage, Encyclopedia};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Refines every question to "Gravity" and rates every article 0.9.
    #[derive(Default)]
    struct StubOracle {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Oracle for StubOracle {
        async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if prompt.starts_with("Transform this user question") {
                Ok("Gravity".to_string())
            } else {
                Ok("0.9".to_string())
            }
        }
    }

    struct StubWiki;

    #[async_trait]
    impl Encyclopedia for StubWiki {
        async fn search(&self, _term: &str, _limit: usize) -> Result<Vec<String>, ServiceError> {
            Ok(vec!["Gravity".to_string()])
        }

        async fn fetch_page(&self, title: &str) -> Result<Option<ArticlePage>, ServiceError> {
            Ok(Some(ArticlePage {
                title: title.to_string(),
                extract: "Gravity is a fundamental interaction.".to_string(),
                categories: Vec::new(),
            }))
        }
    }

    fn state() -> (AppState, Arc<StubOracle>) {
        let oracle = Arc::new(StubOracle::default());
        let pipeline = Pipeline::new(
            oracle.clone(),
            Arc::new(StubWiki),
            PipelineSettings::default(),
        );
        (AppState::with_pipeline(Config::default(), pipeline), oracle)
    }

    fn request(query: &str) -> Json<AskRequest> {
        Json(AskRequest {
            query: query.to_string(),
            classify: false,
            include_chunks: false,
        })
    }

    #[tokio::test]
    async fn test_blank_query_is_bad_request() {
        let (state, oracle) = state();
        let (status, _) = ask(State(state), request("   ")).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overlong_query_is_bad_request() {
        let (state, oracle) = state();
        let query = "q".repeat(MAX_QUERY_LEN + 1);
        let (status, message) = ask(State(state), request(&query)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("1000"));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_query_returns_outcome() {
        let (state, _) = state();
        let Json(resp) = ask(State(state), request("  What is gravity?  ")).await.unwrap();

        assert_eq!(resp.query, "What is gravity?");
        let Outcome::Found(best) = resp.outcome else {
            panic!("expected a found article");
        };
        assert_eq!(best.title, "Gravity");
        assert_eq!(best.score, 0.9);
        assert!(resp.topic.is_none());
        assert!(resp.chunks.is_none());
    }

    #[tokio::test]
    async fn test_requests_wait_for_the_permit() {
        let (state, _) = state();
        let permit = state.ask_semaphore.clone().acquire_owned().await.unwrap();

        let waiting = tokio::time::timeout(
            Duration::from_millis(50),
            ask(State(state.clone()), request("What is gravity?")),
        )
        .await;
        assert!(waiting.is_err(), "request ran while another held the permit");

        drop(permit);
        assert!(ask(State(state), request("What is gravity?")).await.is_ok());
    }
}
