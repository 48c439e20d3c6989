//! Field extraction from one candidate element.
//!
//! [`parse_card`] reads a [`JobCandidate`] out of an element chosen by an
//! adapter. Every field degrades to absent (or to a fallback for the title)
//! when it cannot be found; nothing here returns an error.
//!
//! # Field heuristics
//!
//! | Field | Source |
//! |-------|--------|
//! | title | First heading/`a`/`strong`/`span` descendant (a heading inside it wins), else the card text cut to [`TITLE_FALLBACK_CHARS`] |
//! | url | The title element if it is a link, else the first link in the card |
//! | location | Block around a location word, kept only if it says "location" |
//! | posted date | `<time datetime>`, then `<time>` text, then [`DATE_PATTERNS`] |
//! | closing date | [`DATE_PATTERNS`] |
//! | snippet | Card text, cut to [`SNIPPET_CHARS`] |

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

use super::resolve_link;
use crate::dates::parse_fuzzy_date;
use crate::models::JobCandidate;
use crate::utils::{clean_text, truncate_chars, visible_text};

pub const TITLE_FALLBACK_CHARS: usize = 100;
pub const SNIPPET_CHARS: usize = 400;

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6, a, strong, span").unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());

static LOCATION_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)location|based in|city|country").unwrap());
static LOCATION_LABEL_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\W*(?:location|based in|city|country)s?\W*$").unwrap());

/// The run of date-ish characters that follows a label.
static DATE_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9,./:\-\s]+").unwrap());

/// Which [`JobCandidate`] date a pattern fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Posted,
    Closing,
}

/// A labeled vocabulary whose trailing text is read as a date.
#[derive(Debug)]
pub struct DatePattern {
    pub field: DateField,
    pub label: Regex,
    /// A label match is ignored when the text just before it ends with one of
    /// these (lower-case), e.g. the "date" inside "closing date".
    pub excluded_prefixes: &'static [&'static str],
}

pub static DATE_PATTERNS: Lazy<[DatePattern; 2]> = Lazy::new(|| {
    [
        DatePattern {
            field: DateField::Posted,
            label: Regex::new(r"(?i)\b(?:posted|published|publish|date)\b[:\s]*").unwrap(),
            excluded_prefixes: &["closing ", "start ", "end ", "expiry ", "expiration "],
        },
        DatePattern {
            field: DateField::Closing,
            label: Regex::new(r"(?i)\b(?:closing date|deadline|apply by)\b[:\s]*").unwrap(),
            excluded_prefixes: &[],
        },
    ]
});

/// Result of running one [`DatePattern`] over card text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DateSniff {
    /// First non-empty tail that followed the label.
    raw: Option<String>,
    /// First tail that parsed.
    parsed: Option<DateTime<Utc>>,
}

/// Build a [`JobCandidate`] from one candidate element.
///
/// Pure: the same element and base URL always give the same candidate.
pub fn parse_card(element: ElementRef<'_>, base_url: &Url) -> JobCandidate {
    let text = visible_text(element);

    // A link wrapping a heading (Lever's `a.posting-title > h5`) titles by the heading.
    let title_element = element
        .select(&TITLE)
        .next()
        .map(|el| el.select(&HEADING).next().unwrap_or(el))
        .or_else(|| (element.value().name() == "a").then_some(element));
    let title = title_element
        .map(|el| clean_text(&visible_text(el)))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| truncate_chars(&text, TITLE_FALLBACK_CHARS).trim().to_string());

    let url = title_element
        .filter(|el| el.value().name() == "a")
        .and_then(|el| el.value().attr("href"))
        .or_else(|| element.select(&LINK).find_map(|a| a.value().attr("href")))
        .or_else(|| {
            (element.value().name() == "a")
                .then(|| element.value().attr("href"))
                .flatten()
        })
        .and_then(|href| resolve_link(base_url, href));

    let (mut posted_at, mut posted_text) = time_marker_date(element);
    if posted_at.is_none() {
        let sniff = sniff_date(&text, DateField::Posted);
        posted_at = sniff.parsed;
        posted_text = posted_text.or(sniff.raw);
    }
    let closing_at = sniff_date(&text, DateField::Closing).parsed;

    JobCandidate {
        title,
        url,
        location: find_location(element),
        posted_at,
        posted_text,
        closing_at,
        snippet: truncate_chars(&text, SNIPPET_CHARS),
    }
}

/// Date from the first `<time>` element: its `datetime` attribute, then its text.
fn time_marker_date(element: ElementRef<'_>) -> (Option<DateTime<Utc>>, Option<String>) {
    let Some(time) = element.select(&TIME).next() else {
        return (None, None);
    };
    let sources = [
        time.value().attr("datetime").map(str::trim).map(str::to_string),
        Some(visible_text(time)),
    ];
    let sources: Vec<String> = sources
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    let parsed = sources.iter().find_map(|s| parse_fuzzy_date(s));
    (parsed, sources.into_iter().next())
}

fn sniff_date(text: &str, field: DateField) -> DateSniff {
    let mut sniff = DateSniff::default();
    let Some(pattern) = DATE_PATTERNS.iter().find(|p| p.field == field) else {
        return sniff;
    };
    for m in pattern.label.find_iter(text) {
        let before = text[..m.start()].to_lowercase();
        if pattern.excluded_prefixes.iter().any(|p| before.ends_with(p)) {
            continue;
        }
        let Some(tail) = DATE_TAIL.find(&text[m.end()..]) else {
            continue;
        };
        let tail = tail.as_str().trim();
        if tail.is_empty() {
            continue;
        }
        if sniff.raw.is_none() {
            sniff.raw = Some(tail.to_string());
        }
        if let Some(dt) = parse_fuzzy_date(tail) {
            sniff.parsed = Some(dt);
            break;
        }
    }
    sniff
}

/// Text block around the first location word that actually says "location".
fn find_location(element: ElementRef<'_>) -> Option<String> {
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !LOCATION_WORD.is_match(text) {
            continue;
        }
        let Some(mut block) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        // A bare "Location:" label; the value lives in the enclosing block.
        if LOCATION_LABEL_ONLY.is_match(&visible_text(block)) && block.id() != element.id() {
            if let Some(outer) = block.parent().and_then(ElementRef::wrap) {
                block = outer;
            }
        }
        let block_text = visible_text(block);
        if block_text.to_lowercase().contains("location") {
            return Some(block_text);
        }
    }
    None
}
