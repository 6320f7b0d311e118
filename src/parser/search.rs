//! Record match predicate for search and filter operations.

use crate::error::{LogPagerError, Result};
use grep_matcher::Matcher;
use grep_regex::RegexMatcher;
use memchr::memmem;

/// A compiled search expression
///
/// Plain expressions are case-sensitive substring searches (SIMD via `memmem`), regex
/// expressions use the ripgrep regex engine. An empty expression matches every line.
#[derive(Debug)]
pub enum SearchExpression {
    Any,
    Literal(memmem::Finder<'static>),
    Pattern(RegexMatcher),
}

impl SearchExpression {
    pub fn compile(expression: &str, use_regex: bool) -> Result<Self> {
        if expression.is_empty() {
            return Ok(SearchExpression::Any);
        }

        if use_regex {
            RegexMatcher::new(expression)
                .map(SearchExpression::Pattern)
                .map_err(|e| LogPagerError::invalid_pattern(expression, e))
        } else {
            Ok(SearchExpression::Literal(
                memmem::Finder::new(expression.as_bytes()).into_owned(),
            ))
        }
    }

    /// False for the empty expression, which means no search is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, SearchExpression::Any)
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            SearchExpression::Any => true,
            SearchExpression::Literal(finder) => finder.find(line.as_bytes()).is_some(),
            SearchExpression::Pattern(matcher) => {
                matcher.is_match(line.as_bytes()).unwrap_or(false)
            }
        }
    }

    /// True if any of `lines` matches
    pub fn matches_any<S: AsRef<str>>(&self, lines: &[S]) -> bool {
        match self {
            SearchExpression::Any => true,
            _ => lines.iter().any(|line| self.is_match(line.as_ref())),
        }
    }
}
