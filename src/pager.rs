//! The paging surface shared by every log source.
//!
//! [`LogPager`] is the seam between log sources and viewers: the file-backed
//! [`LogFileParser`](crate::parser::LogFileParser) and the in-memory
//! [`FixtureLogSource`](crate::fixture::FixtureLogSource) both implement it.

use crate::error::Result;
use crate::page::Page;
use crate::record::LogRecord;
use std::fmt;

/// Where a paging operation starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Start after this many records from the beginning of the file
    Ordinal(u64),
    /// Continue from the raw byte offsets the previous operation stopped at. On a fresh
    /// parser both of them sit at end of file, which makes `prev_page(Anchor::Resume, n)`
    /// return the last page.
    Resume,
}

impl Anchor {
    pub fn ordinal(&self) -> Option<u64> {
        match self {
            Anchor::Ordinal(n) => Some(*n),
            Anchor::Resume => None,
        }
    }
}

/// Negative values are the "continue / end of file" sentinel
impl From<i64> for Anchor {
    fn from(value: i64) -> Self {
        u64::try_from(value).map_or(Anchor::Resume, Anchor::Ordinal)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Ordinal(n) => write!(f, "#{n}"),
            Anchor::Resume => f.write_str("resume"),
        }
    }
}

/// Which record fields a source populates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub timestamp: bool,
    pub log_level: bool,
    pub thread_name: bool,
    pub logger_name: bool,
    pub message: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        timestamp: true,
        log_level: true,
        thread_name: true,
        logger_name: true,
        message: true,
    };
}

/// Paged, bidirectional access to log records
///
/// None of the operations fail on reaching the beginning or end of the log; they return
/// a short or empty page instead. Errors are reserved for I/O failures and invalid
/// search expressions.
pub trait LogPager {
    /// Up to `page_size` records following `anchor`
    fn next_page(&mut self, anchor: Anchor, page_size: usize) -> Result<Page<LogRecord>>;

    /// Up to `page_size` records preceding `anchor`, in file order
    fn prev_page(&mut self, anchor: Anchor, page_size: usize) -> Result<Page<LogRecord>>;

    /// The first record after `anchor` matching `expression`, followed by the records
    /// after it
    fn find_next(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>>;

    /// The first record before `anchor` matching `expression` (searching backward),
    /// followed by the records after it
    fn find_prev(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>>;

    /// Only the records after `anchor` matching `expression`
    fn filter_next(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>>;

    /// Only the records before `anchor` matching `expression`, in file order
    fn filter_prev(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_from_i64() {
        assert_eq!(Anchor::from(0), Anchor::Ordinal(0));
        assert_eq!(Anchor::from(42), Anchor::Ordinal(42));
        assert_eq!(Anchor::from(-1), Anchor::Resume);
        assert_eq!(Anchor::from(i64::MIN), Anchor::Resume);
    }

    #[test]
    fn test_anchor_display() {
        assert_eq!(Anchor::Ordinal(7).to_string(), "#7");
        assert_eq!(Anchor::Resume.to_string(), "resume");
        assert_eq!(Anchor::Resume.ordinal(), None);
    }
}
