//! Job-card extraction from career pages.
//!
//! A career page is turned into job candidates in two steps:
//!
//! 1. **Extraction**: a [`SourceAdapter`] picked by host name locates the
//!    elements that each look like one posting
//! 2. **Parsing**: [`card::parse_card`] pulls title, link, location and dates
//!    out of each element
//!
//! # Supported Sources
//!
//! | Source | Module | Host pattern | Candidate elements |
//! |--------|--------|--------------|--------------------|
//! | Workday | [`workday`] | `workday` | Anchors linking to `/job/` |
//! | iCIMS | [`icims`] | `icims` | Short anchors linking to `/jobs/` |
//! | Greenhouse | [`greenhouse`] | `greenhouse.io` | `div.opening` rows |
//! | Lever | [`lever`] | `lever.co` | `div.posting` rows |
//! | Anything else | [`generic`] | every host | Structural heuristics |
//!
//! Adapters are evaluated top-down and the first whose predicate accepts the
//! host wins. The generic adapter accepts every host and is always last.
//! Extraction never fails: a page with nothing recognizable yields no
//! candidates.

pub mod card;
pub mod generic;
pub mod greenhouse;
pub mod icims;
pub mod lever;
pub mod workday;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::utils::visible_text;

/// Locates candidate elements in a parsed page.
pub type ExtractFn = for<'a> fn(&'a Html, &Url) -> Vec<ElementRef<'a>>;

/// A named extraction strategy and the hosts it applies to.
pub struct SourceAdapter {
    pub name: &'static str,
    /// Receives the lower-cased host name.
    pub matches: fn(&str) -> bool,
    pub extract: ExtractFn,
}

/// Registered adapters in evaluation order. The last entry matches every host.
pub static ADAPTERS: [SourceAdapter; 5] = [
    SourceAdapter { name: "workday", matches: workday::matches, extract: workday::extract },
    SourceAdapter { name: "icims", matches: icims::matches, extract: icims::extract },
    SourceAdapter { name: "greenhouse", matches: greenhouse::matches, extract: greenhouse::extract },
    SourceAdapter { name: "lever", matches: lever::matches, extract: lever::extract },
    SourceAdapter { name: "generic", matches: generic::matches, extract: generic::extract },
];

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Lower-cased host name of a page URL, used to pick an adapter.
pub fn source_id(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_lowercase()
}

/// First adapter whose predicate accepts `source_id`.
pub fn adapter_for(source_id: &str) -> &'static SourceAdapter {
    let fallback = &ADAPTERS[ADAPTERS.len() - 1];
    ADAPTERS
        .iter()
        .find(|adapter| (adapter.matches)(source_id))
        .unwrap_or(fallback)
}

/// Candidate elements of `document`, in document order per heuristic.
pub fn extract_cards<'a>(document: &'a Html, source_id: &str, base_url: &Url) -> Vec<ElementRef<'a>> {
    let adapter = adapter_for(source_id);
    let cards = (adapter.extract)(document, base_url);
    debug!(adapter = adapter.name, %source_id, count = cards.len(), "Extracted candidate elements");
    cards
}

/// Resolve `href` against `base_url`, dropping anything that does not form a URL.
pub fn resolve_link(base_url: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base_url.join(href).ok().map(String::from)
}

/// Whether an element carries visible text and a link that resolves.
///
/// The element itself counts when it is an anchor.
pub(crate) fn has_title_and_link(element: ElementRef<'_>, base_url: &Url) -> bool {
    if visible_text(element).is_empty() {
        return false;
    }
    let own_href = (element.value().name() == "a")
        .then(|| element.value().attr("href"))
        .flatten();
    own_href
        .or_else(|| element.select(&LINK).find_map(|a| a.value().attr("href")))
        .and_then(|href| resolve_link(base_url, href))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_dispatch_by_host() {
        assert_eq!(adapter_for("acme.wd5.myworkdayjobs.com").name, "workday");
        assert_eq!(adapter_for("careers-acme.icims.com").name, "icims");
        assert_eq!(adapter_for("boards.greenhouse.io").name, "greenhouse");
        assert_eq!(adapter_for("jobs.lever.co").name, "lever");
        assert_eq!(adapter_for("www.acme.example").name, "generic");
        assert_eq!(adapter_for("").name, "generic");
    }

    #[test]
    fn test_fallback_is_last_and_matches_everything() {
        let last = ADAPTERS.last().unwrap();
        assert_eq!(last.name, "generic");
        assert!((last.matches)("anything.at.all"));
    }

    #[test]
    fn test_source_id_lowercases_host() {
        let url = Url::parse("https://Careers.ACME.example/jobs?x=1").unwrap();
        assert_eq!(source_id(&url), "careers.acme.example");
    }

    #[test]
    fn test_resolve_link() {
        let base = Url::parse("https://acme.example/careers/").unwrap();
        assert_eq!(
            resolve_link(&base, "openings/42").as_deref(),
            Some("https://acme.example/careers/openings/42")
        );
        assert_eq!(
            resolve_link(&base, "/jobs/7").as_deref(),
            Some("https://acme.example/jobs/7")
        );
        assert_eq!(resolve_link(&base, "   "), None);
    }

    #[test]
    fn test_extract_cards_never_fails_on_garbage() {
        let base = Url::parse("https://acme.example/").unwrap();
        let document = Html::parse_document("<<<not really </html> markup &&&");
        assert!(extract_cards(&document, "acme.example", &base).is_empty());
    }
}
