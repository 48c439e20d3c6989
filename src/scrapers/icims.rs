//! iCIMS career portals.
//!
//! Listings are plain anchors into `/jobs/` (or an `icims.com` host). Nav
//! links share the same path prefix, so anchors are kept only when their text
//! is title-sized: fewer than [`MAX_TITLE_WORDS`] words and longer than
//! [`MIN_TITLE_CHARS`] characters.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::has_title_and_link;
use crate::utils::{visible_text, word_count};

pub const MAX_TITLE_WORDS: usize = 12;
pub const MIN_TITLE_CHARS: usize = 3;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

pub fn matches(source_id: &str) -> bool {
    source_id.contains("icims")
}

pub fn extract<'a>(document: &'a Html, base_url: &Url) -> Vec<ElementRef<'a>> {
    document
        .select(&ANCHOR)
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.contains("icims.com") || href.contains("/jobs/"))
        })
        .filter(|a| {
            let title = visible_text(*a);
            word_count(&title) < MAX_TITLE_WORDS && title.chars().count() > MIN_TITLE_CHARS
        })
        .filter(|a| has_title_and_link(*a, base_url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_sized_job_links() {
        let base = Url::parse("https://careers-acme.icims.com/jobs/search").unwrap();
        let html = Html::parse_document(
            r#"<div>
                 <a href="/jobs/1001/registered-nurse/job">Registered Nurse - ICU</a>
                 <a href="/jobs/intro">Go</a>
                 <a href="/jobs/search?pr=1">View all jobs matching your search criteria across every location we have</a>
                 <a href="/about">About Acme Health</a>
               </div>"#,
        );
        let cards = extract(&html, &base);
        let titles: Vec<String> = cards.into_iter().map(visible_text).collect();
        assert_eq!(titles, vec!["Registered Nurse - ICU"]);
    }
}
