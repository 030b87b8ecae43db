use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wiki_answer::api;
use wiki_answer::config::Config;
use wiki_answer::models::AskRequest;
use wiki_answer::report::{self, ReportEntry};
use wiki_answer::state::AppState;

#[derive(Parser)]
#[command(name = "wiki-answer")]
#[command(about = "Find the Wikipedia article that best answers a question", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer questions given as arguments, or one per line on stdin
    Ask {
        queries: Vec<String>,
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit one JSON object per query instead of the text report
        #[arg(long)]
        json: bool,
        /// Also classify each question into a scientific topic
        #[arg(long)]
        classify: bool,
        /// Include the winning article's sentence-aligned chunks (JSON only)
        #[arg(long)]
        chunks: bool,
    },
    /// Serve the HTTP API
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);
    tracing::info!("Wikipedia API: {}", config.wiki.api_url);

    match cli.command {
        Commands::Ask {
            queries,
            output,
            json,
            classify,
            chunks,
        } => {
            let queries = if queries.is_empty() {
                read_stdin_queries()?
            } else {
                queries
            };
            let state = AppState::new(config)?;
            let mut entries = Vec::new();
            let mut lines = Vec::new();

            for query in queries {
                let req = AskRequest {
                    query,
                    classify,
                    include_chunks: chunks,
                };
                let resp = api::ask::answer(&state.pipeline, &req).await;
                if json {
                    lines.push(serde_json::to_string(&resp)?);
                } else {
                    entries.push(ReportEntry {
                        query: resp.query,
                        outcome: resp.outcome,
                        topic: resp.topic,
                    });
                }
            }

            match (output, json) {
                (Some(path), false) => report::write_report(&path, &entries)?,
                (Some(path), true) => std::fs::write(&path, lines.join("\n") + "\n")
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                (None, false) => print!("{}", report::render(&entries)),
                (None, true) => println!("{}", lines.join("\n")),
            }
        }
        Commands::Serve => {
            let bind_addr = config.bind_addr.clone();
            let state = AppState::new(config)?;
            let app = api::router(state);

            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            tracing::info!("Server listening on {bind_addr}");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn read_stdin_queries() -> anyhow::Result<Vec<String>> {
    let mut queries = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read query from stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            queries.push(line.to_string());
        }
    }
    Ok(queries)
}
