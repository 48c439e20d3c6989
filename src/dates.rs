//! Lenient parsing of posting dates found in career-page markup.
//!
//! Career pages write dates every which way: ISO stamps in `datetime`
//! attributes, `Jan 5, 2025` in list rows, `05/01/2025` in tables, often with
//! unrelated words around them. [`parse_fuzzy_date`] first tries the whole
//! string against known formats and, failing that, looks for the first
//! date-like token run inside the text.
//!
//! Dates without a time of day resolve to midnight UTC. Relative phrases
//! such as "3 days ago" are not interpreted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Date-time layouts tried against the whole string, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts. Month names are matched case-insensitively by chrono.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d %b, %Y",
    "%d %B, %Y",
    "%d-%b-%Y",
    "%d.%m.%Y",
];

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \d{4}-\d{2}-\d{2}(?:[T\ ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?
        | \d{4}/\d{1,2}/\d{1,2}
        | \d{1,2}/\d{1,2}/\d{4}
        | \d{1,2}\.\d{1,2}\.\d{4}
        | \d{1,2}-[a-z]{3}-\d{4}
        | (?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}
        | \d{1,2}(?:st|nd|rd|th)?\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?,?\s+\d{4}
        ",
    )
    .unwrap()
});

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

/// Parse a date or date-time out of free text.
///
/// Returns `None` for empty input or when no recognizable date is present;
/// never errors.
///
/// # Examples
///
/// ```ignore
/// assert!(parse_fuzzy_date("2025-01-01").is_some());
/// assert!(parse_fuzzy_date("Posted on: March 3rd, 2025 in London").is_some());
/// assert!(parse_fuzzy_date("apply soon").is_none());
/// ```
pub fn parse_fuzzy_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(dt) = parse_exact(trimmed) {
        return Some(dt);
    }
    DATE_TOKEN
        .find_iter(trimmed)
        .find_map(|m| parse_exact(m.as_str()))
}

/// Parse a string that is expected to be nothing but a date.
fn parse_exact(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let normalized = ORDINAL_SUFFIX.replace_all(s, "$1").replace('.', "");
    let candidates = [s, normalized.as_str()];
    for candidate in candidates {
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, fmt) {
                return date.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_fuzzy_date("2025-01-01"), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn test_rfc3339_with_offset_converts_to_utc() {
        let dt = parse_fuzzy_date("2025-01-01T02:00:00+02:00").unwrap();
        assert_eq!(dt, ymd(2025, 1, 1));
    }

    #[test]
    fn test_month_name_formats() {
        assert_eq!(parse_fuzzy_date("Jan 5, 2025"), Some(ymd(2025, 1, 5)));
        assert_eq!(parse_fuzzy_date("5 January 2025"), Some(ymd(2025, 1, 5)));
        assert_eq!(parse_fuzzy_date("March 3rd, 2025"), Some(ymd(2025, 3, 3)));
        assert_eq!(parse_fuzzy_date("Sep. 9, 2024"), Some(ymd(2024, 9, 9)));
    }

    #[test]
    fn test_us_slash_format() {
        assert_eq!(parse_fuzzy_date("01/15/2025"), Some(ymd(2025, 1, 15)));
    }

    #[test]
    fn test_fuzzy_token_inside_text() {
        assert_eq!(
            parse_fuzzy_date(" 2025-02-10 Location London Apply now"),
            Some(ymd(2025, 2, 10))
        );
        assert_eq!(
            parse_fuzzy_date("on 12 February 2025 by HR"),
            Some(ymd(2025, 2, 12))
        );
    }

    #[test]
    fn test_unparsable_is_none() {
        assert_eq!(parse_fuzzy_date(""), None);
        assert_eq!(parse_fuzzy_date("   "), None);
        assert_eq!(parse_fuzzy_date("as soon as possible"), None);
        assert_eq!(parse_fuzzy_date("2025-13-45"), None);
    }
}
