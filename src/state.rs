use anyhow::Context;
use std::sync::Arc;

use crate::config::Config;
use crate::llm::client::LlmClient;
use crate::pipeline::{Pipeline, PipelineSettings};
use crate::wiki::client::WikipediaClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
    /// One query in flight at a time; later requests wait their turn.
    pub ask_semaphore: Arc<tokio::sync::Semaphore>,
}

impl AppState {
    /// Build the HTTP collaborators from `config` and wire them into a pipeline.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let oracle = LlmClient::new(config.llm.clone()).context("Failed to build LLM client")?;
        let wiki = WikipediaClient::new(&config.wiki).context("Failed to build Wikipedia client")?;
        let pipeline = Pipeline::new(
            Arc::new(oracle),
            Arc::new(wiki),
            PipelineSettings::from(&config),
        );

        Ok(Self::with_pipeline(config, pipeline))
    }

    pub fn with_pipeline(config: Config, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            ask_semaphore: Arc::new(tokio::sync::Semaphore::new(1)),
        }
    }
}
