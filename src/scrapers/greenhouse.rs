//! Greenhouse job boards (`boards.greenhouse.io`).
//!
//! Each opening is a `div.opening` holding the title link and a
//! `span.location`.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::has_title_and_link;

static OPENING: Lazy<Selector> = Lazy::new(|| Selector::parse("div.opening").unwrap());

pub fn matches(source_id: &str) -> bool {
    source_id.contains("greenhouse.io")
}

pub fn extract<'a>(document: &'a Html, base_url: &Url) -> Vec<ElementRef<'a>> {
    document
        .select(&OPENING)
        .filter(|el| has_title_and_link(*el, base_url))
        .collect()
}
