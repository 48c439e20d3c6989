//! Recency decisions for relevant candidates.
//!
//! Evaluated top-down, first match wins:
//!
//! | posted date | parses | within window | allow undated | decision |
//! |-------------|--------|---------------|---------------|----------|
//! | yes | yes | yes | any | include, "posted <date>" |
//! | yes | yes | no | any | exclude |
//! | yes | no | n/a | true | include as undated |
//! | yes | no | n/a | false | exclude |
//! | no | n/a | n/a | true | include as undated |
//! | no | n/a | n/a | false | exclude |
//!
//! The window is inclusive: a posting exactly `window_days` old is kept.

use chrono::{DateTime, Duration, Utc};

use crate::models::JobCandidate;

/// Note attached to records kept without a usable posted date.
pub const UNDATED_NOTE: &str = "no posted date (included for review)";

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recency {
    Include { note: String },
    Exclude,
}

impl Recency {
    #[cfg(test)]
    pub fn is_included(&self) -> bool {
        matches!(self, Recency::Include { .. })
    }
}

/// Decide whether `candidate` is fresh enough to report.
///
/// `reference` is the run's start instant, captured once so every candidate
/// is judged against the same cutoff.
pub fn classify(
    candidate: &JobCandidate,
    window_days: u32,
    allow_undated: bool,
    reference: DateTime<Utc>,
) -> Recency {
    match candidate.posted_at {
        Some(posted) => {
            // Windows reaching past the representable range keep everything.
            let cutoff = Duration::try_days(i64::from(window_days))
                .and_then(|window| reference.checked_sub_signed(window));
            if cutoff.is_none_or(|cutoff| posted >= cutoff) {
                Recency::Include {
                    note: format!("posted {}", posted.date_naive()),
                }
            } else {
                Recency::Exclude
            }
        }
        // Covers both a missing date and a date token that would not parse.
        None if allow_undated => Recency::Include {
            note: UNDATED_NOTE.to_string(),
        },
        None => Recency::Exclude,
    }
}
