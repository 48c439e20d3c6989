//! Lever job sites (`jobs.lever.co`).
//!
//! Postings are `div.posting` blocks; the title sits in an `h5` inside the
//! `a.posting-title` link.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::has_title_and_link;

static POSTING: Lazy<Selector> = Lazy::new(|| Selector::parse("div.posting").unwrap());

pub fn matches(source_id: &str) -> bool {
    source_id.contains("lever.co")
}

pub fn extract<'a>(document: &'a Html, base_url: &Url) -> Vec<ElementRef<'a>> {
    document
        .select(&POSTING)
        .filter(|el| has_title_and_link(*el, base_url))
        .collect()
}
