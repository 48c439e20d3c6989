//! Per-organization scanning and run-level aggregation.
//!
//! [`scan_organization`] runs the whole pipeline for one career page:
//! fetch → extract → parse → relevance → recency. [`run_scan`] does that for
//! every configured organization and gathers the results into a
//! [`ScanReport`].
//!
//! A failing organization becomes one [`OrganizationFetchError`] and never
//! stops the others. Within one organization, records keep extraction order;
//! across organizations they keep configuration order.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::fetch::{FetchDocument, FetchError, RetryPolicy, fetch_with_backoff};
use crate::models::{MatchRecord, Organization, OrganizationFetchError, ScanReport};
use crate::recency::{Recency, classify};
use crate::relevance::is_relevant;
use crate::scrapers::{card::parse_card, extract_cards, source_id};

/// Filter settings shared by every organization in a run.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub keywords: Vec<String>,
    pub recency_window_days: u32,
    pub allow_undated: bool,
    /// Run start instant; every candidate is aged against it.
    pub reference: DateTime<Utc>,
}

/// How the run paces its requests.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// Pause before each organization after a worker's first.
    pub delay: StdDuration,
    /// Upper bound on organizations in flight.
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

/// Fetch one organization's page and return its included records.
///
/// # Errors
///
/// An [`OrganizationFetchError`] when the page cannot be fetched or parsed.
/// Candidate-level misses never surface as errors.
#[instrument(level = "info", skip_all, fields(org = %org.name, url = %org.url))]
pub async fn scan_organization<F: FetchDocument>(
    fetcher: &F,
    org: &Organization,
    settings: &ScanSettings,
    retry: &RetryPolicy,
) -> Result<Vec<MatchRecord>, OrganizationFetchError> {
    let fail = |e: FetchError| OrganizationFetchError {
        organization_name: org.name.clone(),
        organization_url: org.url.clone(),
        error: e.to_string(),
    };

    let base_url = Url::parse(&org.url).map_err(|e| {
        fail(FetchError::Permanent { url: org.url.clone(), message: e.to_string() })
    })?;
    let html = fetch_with_backoff(fetcher, &org.url, retry).await.map_err(fail)?;

    let records = match_page(&html, org, &base_url, settings);
    Ok(records)
}

/// Run extraction, parsing and both filters over one fetched page.
fn match_page(
    html: &str,
    org: &Organization,
    base_url: &Url,
    settings: &ScanSettings,
) -> Vec<MatchRecord> {
    let document = Html::parse_document(html);
    let cards = extract_cards(&document, &source_id(base_url), base_url);
    let candidate_count = cards.len();
    let mut relevant_count = 0usize;

    let records: Vec<MatchRecord> = cards
        .into_iter()
        .map(|card| parse_card(card, base_url))
        .filter_map(|job| {
            let (relevant, matched_keywords) = is_relevant(&job, &settings.keywords);
            if !relevant {
                return None;
            }
            relevant_count += 1;
            match classify(
                &job,
                settings.recency_window_days,
                settings.allow_undated,
                settings.reference,
            ) {
                Recency::Include { note } => Some(MatchRecord {
                    organization_name: org.name.clone(),
                    organization_url: org.url.clone(),
                    job,
                    matched_keywords,
                    recency_note: note,
                }),
                Recency::Exclude => {
                    debug!(title = %job.title, posted_at = ?job.posted_at, "Relevant but outside recency window");
                    None
                }
            }
        })
        .collect();

    info!(
        candidates = candidate_count,
        relevant = relevant_count,
        included = records.len(),
        "Scanned organization"
    );
    records
}

/// Scan every organization and collect matches and failures.
///
/// With `concurrency == 1` organizations are scanned strictly one after
/// another with `delay` between them. Larger values run that many workers
/// at once, each pausing before its next organization; results are still
/// reported in configuration order.
#[instrument(level = "info", skip_all, fields(orgs = orgs.len(), concurrency = pacing.concurrency))]
pub async fn run_scan<F: FetchDocument>(
    fetcher: &F,
    orgs: &[Organization],
    settings: &ScanSettings,
    pacing: &Pacing,
) -> ScanReport {
    let concurrency = pacing.concurrency.max(1);

    let outcomes: Vec<Result<Vec<MatchRecord>, OrganizationFetchError>> =
        stream::iter(orgs.iter().enumerate())
            .map(|(i, org)| async move {
                if i >= concurrency && !pacing.delay.is_zero() {
                    sleep(pacing.delay).await;
                }
                scan_organization(fetcher, org, settings, &pacing.retry).await
            })
            .buffered(concurrency)
            .collect()
            .await;

    let mut report = ScanReport {
        started_at: settings.reference,
        matches: Vec::new(),
        errors: Vec::new(),
    };
    for outcome in outcomes {
        match outcome {
            Ok(records) => report.matches.extend(records),
            Err(e) => {
                warn!(org = %e.organization_name, error = %e.error, "Organization scan failed");
                report.errors.push(e);
            }
        }
    }

    info!(
        matches = report.matches.len(),
        errors = report.errors.len(),
        "Scan complete"
    );
    report
}
