//! # wiki-answer
//!
//! Finds the Wikipedia article that best answers a free-form question, using
//! a generative-text model to rewrite the question and to judge candidates.
//!
//! ## Architecture
//!
//! ```text
//!        ┌──────────────┐
//!        │  User Query  │
//!        └──────┬───────┘
//!               ▼
//!     ┌──────────────────┐   LLM error / quota exhausted
//!     │  Query Refiner   │ ───────────────▶ use raw query
//!     │  (LLM, 60s wait) │
//!     └────────┬─────────┘
//!              ▼
//!     ┌──────────────────┐   no titles
//!     │ Wikipedia Search │ ───────────────▶ search raw query ──▶ NotFound
//!     │   (≤5 titles)    │                                  (no pages found)
//!     └────────┬─────────┘
//!              ▼  for each title, in search order
//!     ┌──────────────────┐   missing / empty / disambiguation
//!     │  Content Fetch   │ ───────────────▶ skip
//!     └────────┬─────────┘
//!              ▼
//!     ┌──────────────────┐   unparseable / LLM error
//!     │ Relevance Score  │ ───────────────▶ 0.0
//!     │  (LLM, 0.0-1.0)  │
//!     └────────┬─────────┘
//!              ▼
//!     ┌──────────────────┐   no candidates
//!     │  Stable sort +   │ ───────────────▶ NotFound (no relevant content)
//!     │  threshold 0.7   │
//!     └────────┬─────────┘
//!              ▼
//!     Found (confident ≥ 0.7, otherwise best effort)
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the LLM, Wikipedia and selection
//! - [`error`] - Typed collaborator errors; rate limits are the only retryable kind
//! - [`retry`] - Attempt-capped retry with fixed or linear backoff
//! - [`llm`] - Oracle trait, HTTP client (Ollama, OpenAI-compatible, Gemini), prompts
//! - [`wiki`] - Encyclopedia trait, MediaWiki client, search and content adapters
//! - [`chunking`] - Extract cleanup, previews and sentence-aligned chunks
//! - [`pipeline`] - Refine, search, fetch, score and select
//! - [`models`] - Candidates and outcomes, request/response types
//! - [`report`] - Plain-text result report
//! - [`api`] - Axum handlers for `serve`
//! - [`state`] - Shared state holding the configured pipeline

pub mod api;
pub mod chunking;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod state;
pub mod wiki;
