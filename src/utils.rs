//! Utility functions for text normalization, HTML helpers and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization and character-bounded truncation
//! - Visible-text extraction from parsed HTML elements
//! - HTML escaping for rendered notifications
//! - String truncation for logging
//! - File system validation for output directories

use itertools::Itertools;
use scraper::ElementRef;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Collapse every whitespace run to a single space and trim the ends.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Keep at most `max` characters of `s`.
///
/// Counts `char`s, not bytes, so multi-byte text never splits a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Number of whitespace-separated words in `s`.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Visible text of an element: every text node outside `<script>`/`<style>`,
/// trimmed and joined with single spaces.
///
/// # Examples
///
/// ```ignore
/// // <li><a href="/x">Data  Analyst</a> <span>Remote</span></li>
/// assert_eq!(visible_text(li), "Data Analyst Remote");
/// ```
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
            if hidden { None } else { Some(&**text) }
        })
        .flat_map(str::split_whitespace)
        .join(" ")
}

/// Escape the five characters that are significant in HTML text and attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
