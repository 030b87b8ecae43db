//! Generative-text oracle: the [`Oracle`] seam, its HTTP client, and the
//! prompts built on top of it (query refinement, relevance scoring, topic
//! classification).

use async_trait::async_trait;

use crate::error::ServiceError;

pub mod client;
pub mod refine;
pub mod relevance;
pub mod topic;

/// A text-in, text-out generative model.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Send one prompt and return the raw text answer.
    ///
    /// Quota exhaustion must be reported as [`ServiceError::RateLimited`] so
    /// callers can back off and retry.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}
