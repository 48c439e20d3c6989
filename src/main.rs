//! # Job Tracker
//!
//! Periodically visits organization career pages, pulls out the job postings
//! on them, keeps the ones that mention a configured keyword and were posted
//! recently enough, and mails a consolidated digest.
//!
//! ## Usage
//!
//! ```sh
//! job_tracker --config ./config.yaml -j ./reports
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Download each career page (retried with backoff)
//! 2. **Extraction**: Find job cards with a per-platform adapter or generic heuristics
//! 3. **Filtering**: Keep cards whose title/snippet match a keyword and whose
//!    posted date falls in the recency window
//! 4. **Output**: Write a JSON report and send an HTML/plaintext email digest

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod fetch;
mod models;
mod outputs;
mod recency;
mod relevance;
mod scan;
mod scrapers;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use outputs::{email, json};
use scan::{Pacing, ScanSettings, run_scan};
use utils::truncate_for_log;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("job_tracker starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(config = %args.config, json_output_dir = ?args.json_output_dir, dry_run = args.dry_run, "Parsed CLI arguments");

    // ---- Load config ----
    let mut config = match config::load_config(&args.config).await {
        Ok(config) => config,
        Err(e) => {
            error!(path = %args.config, error = %e, "Failed to load configuration");
            return Err(e);
        }
    };
    if let (Some(password), Some(smtp)) = (args.smtp_password.clone(), config.smtp.as_mut()) {
        smtp.password = password;
    }

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = utils::ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Scan ----
    let fetcher = HttpFetcher::new(
        &config.fetch.user_agent,
        &config.fetch.accept_language,
        config.fetch.timeout(),
    )?;
    let settings = ScanSettings {
        keywords: config.scan.keywords.clone(),
        recency_window_days: config.scan.recency_days,
        allow_undated: config.scan.allow_undated_jobs,
        reference: Utc::now(),
    };
    let pacing = Pacing {
        delay: StdDuration::from_millis(config.scan.request_delay_ms),
        concurrency: config.scan.concurrency,
        retry: config.fetch.retry_policy(),
    };
    if settings.keywords.is_empty() {
        warn!("No keywords configured; nothing can match");
    }

    let report = run_scan(&fetcher, &config.scan.orgs, &settings, &pacing).await;

    for e in &report.errors {
        warn!(org = %e.organization_name, url = %e.organization_url, error = %e.error, "Organization skipped");
    }

    // ---- JSON output ----
    if let Some(dir) = &args.json_output_dir {
        match json::write_report(&report, dir).await {
            Ok(path) => info!(%path, "JSON report written"),
            Err(e) => error!(error = %e, "Failed to write JSON report"),
        }
    }

    // ---- Email digest ----
    if report.matches.is_empty() {
        info!("No matches found for this run");
    } else if args.dry_run {
        let text = email::render_text(&report);
        info!(
            matches = report.matches.len(),
            preview = %truncate_for_log(&text, 500),
            "Dry run; not sending digest"
        );
    } else {
        match (&config.smtp, &config.email) {
            (Some(smtp), Some(email_cfg)) => {
                email::send_digest(smtp, email_cfg, &report).await?;
            }
            _ => warn!(
                matches = report.matches.len(),
                "smtp/email not configured; digest not sent"
            ),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        matches = report.matches.len(),
        errors = report.errors.len(),
        "Execution complete"
    );

    Ok(())
}
