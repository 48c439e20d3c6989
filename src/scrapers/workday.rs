//! Workday career sites.
//!
//! Workday renders each posting as an anchor pointing at a `/job/` path
//! (or, on older tenants, at a `myworkdaysite` host). The anchors themselves
//! are the candidate elements.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::has_title_and_link;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

pub fn matches(source_id: &str) -> bool {
    source_id.contains("workday")
}

pub fn extract<'a>(document: &'a Html, base_url: &Url) -> Vec<ElementRef<'a>> {
    document
        .select(&ANCHOR)
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.contains("/job/") || href.contains("myworkdaysite"))
        })
        .filter(|a| has_title_and_link(*a, base_url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::visible_text;

    #[test]
    fn test_job_anchors_only() {
        let base = Url::parse("https://acme.wd5.myworkdayjobs.com/en-US/External").unwrap();
        let html = Html::parse_document(
            r#"<ul>
                 <li><a href="/en-US/External/job/Berlin/Backend-Engineer_R123">Backend Engineer</a></li>
                 <li><a href="/en-US/External/job/Remote/Analyst_R124"></a></li>
                 <li><a href="/en-US/External/login">Sign In</a></li>
               </ul>"#,
        );
        let cards = extract(&html, &base);
        assert_eq!(cards.len(), 1);
        assert_eq!(visible_text(cards[0]), "Backend Engineer");
    }

    #[test]
    fn test_host_predicate() {
        assert!(matches("acme.wd1.myworkdayjobs.com"));
        assert!(!matches("careers.acme.example"));
    }
}
