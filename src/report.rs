//! Plain-text rendering of pipeline results for the `ask` subcommand.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

use crate::llm::topic::Topic;
use crate::models::{Confidence, NotFoundReason, Outcome};

/// Characters of article body shown under CONTENT PREVIEW.
const PREVIEW_CHARS: usize = 300;

/// One answered query.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub query: String,
    pub outcome: Outcome,
    pub topic: Option<Topic>,
}

pub fn render(entries: &[ReportEntry]) -> String {
    entries.iter().map(ReportEntry::to_string).collect()
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banner = "=".repeat(50);
        let rule = "-".repeat(50);

        writeln!(f, "\n{banner}")?;
        writeln!(f, "USER QUERY: {}", self.query)?;
        if let Some(topic) = self.topic {
            writeln!(f, "TOPIC: {topic}")?;
        }
        writeln!(f, "{banner}")?;

        match &self.outcome {
            Outcome::Found(found) => {
                let label = match found.confidence {
                    Confidence::Confident => "confident match",
                    Confidence::BestEffort => "best available",
                };
                writeln!(f, "TITLE: {}", found.title)?;
                writeln!(f, "RELEVANCE: {:.2} ({label})", found.score)?;
                writeln!(f, "\nCONTENT PREVIEW:")?;
                writeln!(f, "{rule}")?;
                writeln!(f, "{}", found.preview(PREVIEW_CHARS))?;
                writeln!(f, "{rule}")
            }
            Outcome::NotFound { reason } => {
                let message = match reason {
                    NotFoundReason::NoPagesFound => "No Wikipedia pages found for this query.",
                    NotFoundReason::NoRelevantContent => "No relevant Wikipedia content found.",
                };
                writeln!(f, "ERROR: {message}")
            }
        }
    }
}

/// Render `entries` and write them to `path`, replacing any existing file.
pub fn write_report(path: &Path, entries: &[ReportEntry]) -> Result<()> {
    std::fs::write(path, render(entries))
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
