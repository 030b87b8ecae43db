use crate::chunking;
use crate::llm::Oracle;
use crate::retry::{with_retry, RetryPolicy};

/// Characters of article body shown to the oracle.
const PREVIEW_CHARS: usize = 500;

/// Rate how directly an article answers `query`, in `[0.0, 1.0]`.
///
/// An unparseable answer, quota exhaustion and oracle errors all score 0.0.
pub async fn score_relevance(
    oracle: &dyn Oracle,
    policy: &RetryPolicy,
    query: &str,
    title: &str,
    body: &str,
) -> f32 {
    let prompt = build_score_prompt(query, title, body);
    let prompt = prompt.as_str();

    let answer = match with_retry(policy, "Relevance scoring", None, move || async move {
        oracle.generate(prompt).await.map(Some)
    })
    .await
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!("LLM relevance scoring error for '{title}': {e}");
            None
        }
    };

    let Some(answer) = answer else {
        return 0.0;
    };

    match parse_score(&answer) {
        Some(score) => score,
        None => {
            tracing::warn!("Unparseable relevance score for '{title}': {answer:?}");
            0.0
        }
    }
}

fn build_score_prompt(query: &str, title: &str, body: &str) -> String {
    let excerpt = chunking::preview(body, PREVIEW_CHARS);
    format!(
        "You are a relevance scoring algorithm that evaluates how well a Wikipedia \
         article answers a user's question.\n\n\
         USER QUESTION: \"{query}\"\n\
         WIKIPEDIA ARTICLE TITLE: \"{title}\"\n\
         WIKIPEDIA ARTICLE EXCERPT: \"{excerpt}\"\n\n\
         Score how directly this article answers the user's question:\n\
         - 1.0: Perfectly answers the question.\n\
         - 0.8-0.9: Highly relevant.\n\
         - 0.6-0.7: Partially addresses the question.\n\
         - 0.4-0.5: Minimally relevant.\n\
         - 0.0: Completely irrelevant.\n\n\
         Output ONLY a single decimal score between 0.0 and 1.0."
    )
}

/// Keep only digits and decimal points, parse, and clamp into `[0.0, 1.0]`.
fn parse_score(answer: &str) -> Option<f32> {
    let numeric: String = answer
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let score: f32 = numeric.parse().ok()?;
    Some(score.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FixedOracle {
        answer: Result<&'static str, fn() -> ServiceError>,
        calls: AtomicU32,
        last_prompt: Mutex<String>,
    }

    impl FixedOracle {
        fn answering(answer: &'static str) -> Self {
            Self {
                answer: Ok(answer),
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }

        fn failing(err: fn() -> ServiceError) -> Self {
            Self {
                answer: Err(err),
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }
    }

    #[async_trait]
    impl Oracle for FixedOracle {
        async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            match self.answer {
                Ok(text) => Ok(text.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    async fn score_with(oracle: &FixedOracle) -> f32 {
        score_relevance(
            oracle,
            &RetryPolicy::oracle_default(),
            "What is gravity?",
            "Gravity",
            "Gravity is a fundamental interaction.",
        )
        .await
    }

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(parse_score("0.85"), Some(0.85));
        assert_eq!(parse_score(" 0.3\n"), Some(0.3));
    }

    #[test]
    fn test_parse_strips_surrounding_text() {
        assert_eq!(parse_score("Score: 0.9"), Some(0.9));
        assert_eq!(parse_score("**0.7**"), Some(0.7));
    }

    #[test]
    fn test_parse_clamps_out_of_range() {
        assert_eq!(parse_score("7"), Some(1.0));
        assert_eq!(parse_score("85"), Some(1.0));
        // The minus sign is stripped before parsing.
        assert_eq!(parse_score("-0.5"), Some(0.5));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_score("irrelevant"), None);
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("0.5 or 0.6"), None);
    }

    #[test]
    fn test_prompt_truncates_body() {
        let body = "a".repeat(2_000);
        let prompt = build_score_prompt("q", "t", &body);
        assert!(prompt.contains(&format!("\"{}...\"", "a".repeat(500))));
        assert!(!prompt.contains(&"a".repeat(501)));
    }

    #[tokio::test]
    async fn test_score_within_range() {
        let oracle = FixedOracle::answering("0.95");
        assert_eq!(score_with(&oracle).await, 0.95);
        assert!(oracle.last_prompt.lock().unwrap().contains("USER QUESTION: \"What is gravity?\""));
    }

    #[tokio::test]
    async fn test_out_of_range_is_clamped() {
        let oracle = FixedOracle::answering("Relevance 3.5 out of 1");
        let score = score_with(&oracle).await;
        assert!((0.0..=1.0).contains(&score));
    }

    #[tokio::test]
    async fn test_garbage_answer_scores_zero() {
        let oracle = FixedOracle::answering("I cannot say.");
        assert_eq!(score_with(&oracle).await, 0.0);
    }

    #[tokio::test]
    async fn test_fatal_error_scores_zero_after_one_call() {
        let oracle = FixedOracle::failing(|| ServiceError::Decode {
            service: "llm",
            detail: "truncated".to_string(),
        });
        assert_eq!(score_with(&oracle).await, 0.0);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_exhaustion_scores_zero() {
        let oracle = FixedOracle::failing(|| ServiceError::RateLimited {
            service: "llm",
            detail: "429".to_string(),
        });
        assert_eq!(score_with(&oracle).await, 0.0);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 4);
    }
}
