use crate::llm::Oracle;
use crate::retry::{with_retry, RetryPolicy};

/// Rewrite a user question into a concise, Wikipedia-style search term.
///
/// Never fails: quota exhaustion, any oracle error, or a blank answer all
/// yield the original query.
pub async fn refine_query(oracle: &dyn Oracle, policy: &RetryPolicy, query: &str) -> String {
    let prompt = build_refine_prompt(query);
    let prompt = prompt.as_str();

    let answer = match with_retry(policy, "Query refinement", None, move || async move {
        oracle.generate(prompt).await.map(Some)
    })
    .await
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!("LLM error during query refinement: {e}");
            None
        }
    };

    match answer.map(|a| a.trim().to_string()) {
        Some(refined) if !refined.is_empty() => refined,
        _ => query.to_string(),
    }
}

fn build_refine_prompt(query: &str) -> String {
    format!(
        "Transform this user question into the optimal Wikipedia search term:\n\n\
         \"{query}\"\n\n\
         Rules to follow:\n\
         1. For \"what is\" questions: use the subject noun phrase \
         (e.g., \"What is quantum computing?\" -> \"Quantum computing\").\n\
         2. For \"who\" questions: focus on the achievement or concept \
         (e.g., \"Who discovered gravity?\" -> \"Discovery of gravity\").\n\
         3. For \"why/how\" questions: extract the core phenomenon \
         (e.g., \"Why is the sky blue?\" -> \"Rayleigh scattering\").\n\
         4. For cause/effect questions: focus on the effect \
         (e.g., \"What causes earthquakes?\" -> \"Earthquake\").\n\
         5. Follow Wikipedia's naming pattern: concise noun phrases.\n\
         6. Limit to 1-4 words unless additional context is necessary.\n\
         7. Prefer technical terms over colloquial expressions.\n\
         8. Do NOT include names, dates, or direct answers.\n\n\
         Output ONLY the search term as plain text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays canned answers in order and records every prompt.
    struct ScriptedOracle {
        answers: Mutex<Vec<Result<String, ServiceError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedOracle {
        fn new(answers: Vec<Result<String, ServiceError>>) -> Self {
            Self {
                answers: Mutex::new(answers),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Oracle for ScriptedOracle {
        async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                panic!("oracle called more often than scripted");
            }
            answers.remove(0)
        }
    }

    fn quota() -> ServiceError {
        ServiceError::RateLimited {
            service: "llm",
            detail: "quota".to_string(),
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::fixed(3, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_answer_is_trimmed() {
        let oracle = ScriptedOracle::new(vec![Ok("  Quantum entanglement\n".to_string())]);
        let refined = refine_query(&oracle, &policy(), "What is quantum entanglement?").await;
        assert_eq!(refined, "Quantum entanglement");
    }

    #[tokio::test]
    async fn test_prompt_embeds_query() {
        let oracle = ScriptedOracle::new(vec![Ok("Gravity".to_string())]);
        refine_query(&oracle, &policy(), "Why do apples fall?").await;
        let prompts = oracle.prompts.lock().unwrap();
        assert!(prompts[0].contains("\"Why do apples fall?\""));
    }

    #[tokio::test]
    async fn test_fatal_error_falls_back_to_query() {
        let oracle = ScriptedOracle::new(vec![Err(ServiceError::Status {
            service: "llm",
            status: 500,
            body: "boom".to_string(),
        })]);
        let refined = refine_query(&oracle, &policy(), "What is gravity?").await;
        assert_eq!(refined, "What is gravity?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_exhaustion_falls_back_to_query() {
        let oracle = ScriptedOracle::new((0..4).map(|_| Err(quota())).collect());
        let refined = refine_query(&oracle, &policy(), "What is gravity?").await;
        assert_eq!(refined, "What is gravity?");
        assert_eq!(oracle.prompts.lock().unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_then_success() {
        let oracle = ScriptedOracle::new(vec![Err(quota()), Ok("Gravity".to_string())]);
        let refined = refine_query(&oracle, &policy(), "What is gravity?").await;
        assert_eq!(refined, "Gravity");
    }

    #[tokio::test]
    async fn test_blank_answer_falls_back_to_query() {
        let oracle = ScriptedOracle::new(vec![Ok("   ".to_string())]);
        let refined = refine_query(&oracle, &policy(), "What is gravity?").await;
        assert_eq!(refined, "What is gravity?");
    }
}
