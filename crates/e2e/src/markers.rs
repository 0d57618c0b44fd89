//! Content markers matched against rendered pages

use regex::{Regex, RegexBuilder};

use crate::error::{HarnessError, HarnessResult};

/// Something expected to appear in a page
#[derive(Debug, Clone)]
pub enum Marker {
    /// Exact, case-sensitive substring
    Text(&'static str),
    /// Case-insensitive regex where `.` also matches newlines
    Pattern(Regex),
}

impl Marker {
    pub fn pattern(source: &str) -> HarnessResult<Self> {
        RegexBuilder::new(source)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map(Marker::Pattern)
            .map_err(|e| HarnessError::Setup(format!("invalid marker pattern '{}': {}", source, e)))
    }

    pub fn found_in(&self, haystack: &str) -> bool {
        match self {
            Marker::Text(text) => haystack.contains(text),
            Marker::Pattern(re) => re.is_match(haystack),
        }
    }
}

pub fn texts(items: &[&'static str]) -> Vec<Marker> {
    items.iter().copied().map(Marker::Text).collect()
}

pub fn patterns(sources: &[&str]) -> HarnessResult<Vec<Marker>> {
    sources.iter().map(|s| Marker::pattern(s)).collect()
}

/// How many of `markers` occur in `haystack`
pub fn count_found(markers: &[Marker], haystack: &str) -> usize {
    markers.iter().filter(|m| m.found_in(haystack)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_case_sensitive() {
        let marker = Marker::Text("MARKET FIT");
        assert!(marker.found_in("<h3>MARKET FIT</h3>"));
        assert!(!marker.found_in("<h3>Market Fit</h3>"));
    }

    #[test]
    fn test_pattern_spans_lines_and_ignores_case() {
        let marker = Marker::pattern(r"MATCH.*?%").unwrap();
        assert!(marker.found_in("<span>Match</span>\n<div>92%</div>"));
        assert!(!marker.found_in("<span>Match</span> none"));
    }

    #[test]
    fn test_count_found() {
        let markers = texts(&["Home", "Resume", "Jobs"]);
        assert_eq!(count_found(&markers, "Home | Jobs"), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(Marker::pattern("(unclosed"), Err(HarnessError::Setup(_))));
    }
}
