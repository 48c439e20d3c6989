//! Keyword relevance over a candidate's own text.
//!
//! Only the title and snippet are searched, so navigation, footers and the
//! rest of the page can never make a candidate relevant.

use crate::models::JobCandidate;

/// Whether any keyword occurs in the candidate's title or snippet, and which.
///
/// Matching is a case-insensitive substring test. Matched keywords come back
/// in the order they were configured. Blank keywords never match.
pub fn is_relevant(candidate: &JobCandidate, keywords: &[String]) -> (bool, Vec<String>) {
    let haystack = format!("{} {}", candidate.title, candidate.snippet).to_lowercase();
    let matched: Vec<String> = keywords
        .iter()
        .filter(|kw| {
            let kw = kw.trim().to_lowercase();
            !kw.is_empty() && haystack.contains(&kw)
        })
        .cloned()
        .collect();
    (!matched.is_empty(), matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, snippet: &str) -> JobCandidate {
        JobCandidate {
            title: title.to_string(),
            snippet: snippet.to_string(),
            ..Default::default()
        }
    }

    fn kws(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let job = candidate("Senior BACKEND Engineer", "");
        assert_eq!(is_relevant(&job, &kws(&["backend"])), (true, kws(&["backend"])));
    }

    #[test]
    fn test_snippet_only_match_counts() {
        let job = candidate("Engineer II", "Work on our Rust backend services");
        assert!(is_relevant(&job, &kws(&["rust"])).0);
    }

    #[test]
    fn test_title_only_match_counts() {
        let job = candidate("Rust Developer", "Join a friendly team");
        assert!(is_relevant(&job, &kws(&["rust"])).0);
    }

    #[test]
    fn test_no_match() {
        let job = candidate("Senior Backend Engineer", "APIs and databases");
        assert_eq!(is_relevant(&job, &kws(&["frontend"])), (false, vec![]));
    }

    #[test]
    fn test_matched_keywords_keep_config_order() {
        let job = candidate("Data Engineer", "python and sql");
        let (relevant, matched) = is_relevant(&job, &kws(&["sql", "java", "Data"]));
        assert!(relevant);
        assert_eq!(matched, kws(&["sql", "Data"]));
    }

    #[test]
    fn test_blank_keywords_never_match() {
        let job = candidate("Anything", "at all");
        assert_eq!(is_relevant(&job, &kws(&["", "   "])), (false, vec![]));
    }
}
