use regex::Regex;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// Matches a literal query as a whole word.
///
/// The query is escaped, so metacharacters match themselves, and wrapped in
/// Unicode word boundaries. Matching is case-sensitive. The compiled regex is
/// `Sync`; one matcher is built per run and shared by every worker.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    query: String,
    regex: Regex,
}

impl WordMatcher {
    pub fn new(query: &str) -> SearchResult<Self> {
        if query.is_empty() {
            return Err(SearchError::invalid_pattern("query must not be empty"));
        }

        let pattern = format!(r"\b{}\b", regex::escape(query));
        debug!("Compiled whole-word pattern: {}", pattern);
        let regex = Regex::new(&pattern).map_err(|e| SearchError::invalid_pattern(e.to_string()))?;

        Ok(Self {
            query: query.to_string(),
            regex,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether `line` contains the query at least once as a whole word
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_boundaries() {
        let matcher = WordMatcher::new("cat").unwrap();
        assert!(matcher.is_match("the cat sat"));
        assert!(matcher.is_match("cat"));
        assert!(matcher.is_match("(cat)"));
        assert!(matcher.is_match("cat, dog"));
        assert!(!matcher.is_match("concatenate"));
        assert!(!matcher.is_match("category"));
        assert!(!matcher.is_match("bobcat"));
        assert!(!matcher.is_match("cat_food"));
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = WordMatcher::new("foo").unwrap();
        assert!(matcher.is_match("foo bar"));
        assert!(!matcher.is_match("Foo bar"));
        assert!(!matcher.is_match("FOO"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let matcher = WordMatcher::new("a.b").unwrap();
        assert!(matcher.is_match("see a.b here"));
        assert!(!matcher.is_match("see axb here"));

        let matcher = WordMatcher::new("x+y").unwrap();
        assert!(matcher.is_match("x+y = z"));
        assert!(!matcher.is_match("xxy"));
    }

    #[test]
    fn test_unicode_word_characters() {
        let matcher = WordMatcher::new("café").unwrap();
        assert!(matcher.is_match("un café noir"));
        assert!(!matcher.is_match("cafés"));

        let matcher = WordMatcher::new("naïve").unwrap();
        assert!(!matcher.is_match("xnaïve"));
    }

    #[test]
    fn test_empty_query_rejected() {
        let err = WordMatcher::new("").unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));
    }
}
