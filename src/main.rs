//! # Cowsay Daily News
//!
//! A scheduled content pipeline that fetches the day's top headlines,
//! classifies each one into a topic category with Gemini, synthesizes a
//! short narrative and a punny title, renders everything into a
//! cowsay-themed HTML digest, and publishes it to a Ghost blog (optionally
//! triggering the newsletter email).
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... GEMINI_API_KEY=... \
//! GHOST_ADMIN_API_KEY=id:secret GHOST_URL=https://blog.example.com \
//! cowsay-daily-news
//! ```
//!
//! ## Architecture
//!
//! One linear pass per run, each stage consuming the previous one's output:
//! 1. **Fetch**: top headlines from the news source, with bounded retry
//! 2. **Filter**: strip source suffixes, drop blocklisted content/domains
//! 3. **Classify**: one model call per headline into a fixed category set,
//!    capped per category, strictly sequential with rate pacing
//! 4. **Synthesize**: narrative summary + punny title (two model calls)
//! 5. **Render**: deterministic cowsay HTML fragment
//! 6. **Publish**: draft then publish via the Ghost admin API
//!
//! Exit codes: 0 on success (including the draft-only partial outcome),
//! 2 on configuration errors, 1 on fetch or draft-creation failure.

use chrono::Local;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod classify;
mod cli;
mod config;
mod error;
mod filter;
mod gemini;
mod ghost;
mod models;
mod news;
mod pacing;
mod render;
mod synthesize;
mod utils;

use classify::Classifier;
use cli::Cli;
use config::Config;
use error::PipelineError;
use filter::FilterRules;
use gemini::GeminiClient;
use ghost::{GhostClient, PublishOutcome};
use models::{ClassifiedGroups, DailySummary};
use news::{NewsApi, RetryingFetcher};
use pacing::Sleeper;
use synthesize::Synthesizer;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    let config = match Config::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::from(2);
        }
    };

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<(), PipelineError> {
    let start_time = std::time::Instant::now();
    info!("cowsay-daily-news starting up");

    let http = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| PipelineError::Http(e.to_string()))?;

    // ---- Fetch ----
    let fetcher = RetryingFetcher::new(NewsApi::new(&http, config), Sleeper);
    let records = fetcher.fetch(&config.country, config.page_size).await?;

    // ---- Filter ----
    let rules = FilterRules::default();
    let fetched = records.len();
    let candidates = filter::normalize(records, &rules);
    info!(
        kept = candidates.len(),
        dropped = fetched - candidates.len(),
        "normalized and filtered headlines"
    );

    // ---- Classify ----
    let model = GeminiClient::new(&http, config);
    let pacer = Sleeper;
    let classifier = Classifier::new(&model, &pacer);
    let groups = classifier
        .classify_all(
            candidates,
            ClassifiedGroups::new(config.category_cap, config.other_cap),
        )
        .await;
    for (category, items) in groups.iter() {
        if !items.is_empty() {
            info!(category = %category, count = items.len(), "classified group");
        }
    }

    // ---- Synthesize ----
    let synthesizer = Synthesizer::new(&model, &pacer, config.title_strategy);
    let narrative = synthesizer.summarize(&groups).await;
    let today = Local::now().date_naive();
    let title = synthesizer.title(&groups, &narrative, today).await;
    let summary = DailySummary { narrative, title };
    info!(title = %summary.title, "synthesized digest texts");

    // ---- Render ----
    let html = render::render_digest(&groups, Some(&summary.narrative));
    info!(bytes = html.len(), "rendered digest HTML");

    if config.dry_run {
        println!("{html}");
        info!("dry run complete; skipping publish");
        return Ok(());
    }

    // ---- Publish ----
    let publisher = GhostClient::new(&http, config);
    match publisher.publish(&summary.title, &html).await? {
        PublishOutcome::Published { url, email } => {
            match url {
                Some(url) => info!(%url, "post published"),
                None => info!("post published"),
            }
            if let Some(email) = email {
                info!(
                    status = email.status.as_deref().unwrap_or("unknown"),
                    recipients = email.email_count.unwrap_or(0),
                    "newsletter email dispatched"
                );
            }
        }
        PublishOutcome::DraftOnly { post_id, reason } => {
            warn!(%post_id, %reason, "post remains a draft on the target");
        }
    }

    let elapsed = start_time.elapsed();
    info!(secs = elapsed.as_secs(), "run complete");
    Ok(())
}
