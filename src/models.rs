//! Data models for job candidates, match records and run reports.
//!
//! This module defines the values that flow through the scan pipeline:
//! - [`Organization`]: A configured career page to visit
//! - [`JobCandidate`]: One hypothesized job posting parsed out of a page
//! - [`MatchRecord`]: A candidate that passed the keyword and recency filters
//! - [`OrganizationFetchError`]: An organization whose page could not be scanned
//! - [`ScanReport`]: Everything one run produced, handed to the outputs
//!
//! All of them are plain values; a run builds a fresh [`ScanReport`] and never
//! looks at earlier ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organization whose career page is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Organization {
    /// Display name used in reports.
    pub name: String,
    /// URL of the career page.
    pub url: String,
}

/// One hypothesized job posting.
///
/// Only `title` and `snippet` are searched for keywords; everything else is
/// carried for display or recency decisions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct JobCandidate {
    /// Plain-text title. Empty when nothing could be recovered, never absent.
    pub title: String,
    /// Absolute link to the posting, resolved against the page URL.
    pub url: Option<String>,
    /// Location text, taken verbatim from the block that mentions it.
    pub location: Option<String>,
    /// When the posting went up, if a date could be parsed.
    pub posted_at: Option<DateTime<Utc>>,
    /// The raw posted-date token that was found, parsed or not.
    pub posted_text: Option<String>,
    /// Application deadline. Informational only.
    pub closing_at: Option<DateTime<Utc>>,
    /// Whitespace-normalized text of the whole card, bounded in length.
    pub snippet: String,
}

/// A candidate that survived both filters, with its provenance attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub organization_name: String,
    pub organization_url: String,
    #[serde(flatten)]
    pub job: JobCandidate,
    /// Configured keywords found in the title or snippet, in config order.
    pub matched_keywords: Vec<String>,
    /// Why the record was included, e.g. `"posted 2025-01-01"`.
    pub recency_note: String,
}

/// An organization that could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationFetchError {
    pub organization_name: String,
    pub organization_url: String,
    pub error: String,
}

/// The result of a full run over every configured organization.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Reference instant captured once at the start of the run.
    pub started_at: DateTime<Utc>,
    pub matches: Vec<MatchRecord>,
    pub errors: Vec<OrganizationFetchError>,
}
