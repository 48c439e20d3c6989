//! Heuristic extraction for career pages with no dedicated adapter.
//!
//! Three structural heuristics run in order and their results are unioned:
//!
//! 1. Every `<article>` element
//! 2. Every `div`/`section`/`article` whose `class` mentions job vocabulary
//!    (job, position, vacancy, opening, role, career, posting)
//! 3. Every `<li>` holding a link whose text is between 5 and 60 words
//!    (exclusive), long enough to skip icon links and short enough to be a
//!    single posting
//!
//! The heuristics overlap, so candidates are deduplicated on the first
//! [`DEDUP_KEY_CHARS`] characters of their serialized HTML, keeping the first
//! occurrence.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::utils::{visible_text, word_count};

/// Length of the serialized-HTML prefix used as the dedup key.
pub const DEDUP_KEY_CHARS: usize = 200;
/// List items must hold strictly more words than this.
pub const MIN_ITEM_WORDS: usize = 5;
/// List items must hold strictly fewer words than this.
pub const MAX_ITEM_WORDS: usize = 60;

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CLASSED_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div[class], section[class], article[class]").unwrap());
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

static JOB_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)job|position|vacancy|opening|role|career|posting").unwrap());

pub fn matches(_source_id: &str) -> bool {
    true
}

pub fn extract<'a>(document: &'a Html, _base_url: &Url) -> Vec<ElementRef<'a>> {
    let articles = document.select(&ARTICLE);

    let job_blocks = document.select(&CLASSED_BLOCK).filter(|el| {
        el.value()
            .attr("class")
            .is_some_and(|class| JOB_CLASS.is_match(class))
    });

    let link_items = document.select(&LIST_ITEM).filter(|li| {
        if li.select(&ANCHOR).next().is_none() {
            return false;
        }
        let words = word_count(&visible_text(*li));
        words > MIN_ITEM_WORDS && words < MAX_ITEM_WORDS
    });

    articles
        .chain(job_blocks)
        .chain(link_items)
        .unique_by(|el| dedup_key(*el))
        .collect()
}

fn dedup_key(element: ElementRef<'_>) -> String {
    element.html().chars().take(DEDUP_KEY_CHARS).collect()
}
