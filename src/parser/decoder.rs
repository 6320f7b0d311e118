//! Field decoding for log4j-style records
//!
//! Layout of a record's first line:
//!
//! ```text
//! 2024-01-01 00:00:01,000 ERROR [main] - com.example.Service - request failed
//! └──── timestamp ──────┘ level  thread  └──── logger ─────┘   └── body[0] ─┘
//! ```

use crate::error::{DecodeError, DecodeErrorKind, LogPagerError, Result};
use crate::parser::navigator::RawRecord;
use crate::record::{LogLevel, LogRecord};
use chrono::{NaiveDate, NaiveDateTime};
use grep_matcher::Matcher;
use grep_regex::RegexMatcher;

const LEVEL_PATTERN: &str = "FATAL|ERROR|WARN|INFO|DEBUG|TRACE";
const THREAD_PATTERN: &str = r"\[[^\[\]]*\]";
const SEPARATOR: &str = " - ";

/// Decodes raw line groups into [`LogRecord`]s
#[derive(Debug)]
pub struct RecordDecoder {
    timestamp_format: String,
    /// Width of the timestamp field in characters
    timestamp_width: usize,
    level: RegexMatcher,
    thread: RegexMatcher,
}

impl RecordDecoder {
    pub fn new(timestamp_format: &str) -> Result<Self> {
        Ok(Self {
            timestamp_format: timestamp_format.to_string(),
            timestamp_width: timestamp_width(timestamp_format)?,
            level: RegexMatcher::new(LEVEL_PATTERN)
                .map_err(|e| LogPagerError::invalid_pattern(LEVEL_PATTERN, e))?,
            thread: RegexMatcher::new(THREAD_PATTERN)
                .map_err(|e| LogPagerError::invalid_pattern(THREAD_PATTERN, e))?,
        })
    }

    pub fn timestamp_width(&self) -> usize {
        self.timestamp_width
    }

    /// Decode the fixed fields of the first line; continuation lines are kept verbatim
    pub fn decode(&self, raw: &RawRecord) -> std::result::Result<LogRecord, DecodeError> {
        let fail = |kind| DecodeError {
            start_line: raw.start_line,
            offset: raw.start,
            kind,
            line: raw.lines[0].clone(),
        };

        let (stamp, rest) = split_at_char(&raw.lines[0], self.timestamp_width);
        let timestamp = NaiveDateTime::parse_from_str(stamp, &self.timestamp_format).ok();

        let level_match =
            find(&self.level, rest).ok_or_else(|| fail(DecodeErrorKind::MissingLevel))?;
        let level: LogLevel = rest[level_match.start()..level_match.end()]
            .parse()
            .map_err(|_| fail(DecodeErrorKind::MissingLevel))?;
        let rest = &rest[level_match.end()..];

        let thread_match =
            find(&self.thread, rest).ok_or_else(|| fail(DecodeErrorKind::MissingThread))?;
        let thread_name = &rest[thread_match.start() + 1..thread_match.end() - 1];
        let rest = &rest[thread_match.end()..];

        let (logger_name, message) = rest
            .strip_prefix(SEPARATOR)
            .and_then(|rest| rest.split_once(SEPARATOR))
            .ok_or_else(|| fail(DecodeErrorKind::MissingSeparator))?;

        Ok(LogRecord::new(
            raw.start_line,
            timestamp,
            level,
            thread_name,
            logger_name,
            message,
            raw.lines[1..].to_vec(),
        ))
    }
}

fn find(matcher: &RegexMatcher, haystack: &str) -> Option<grep_matcher::Match> {
    matcher.find(haystack.as_bytes()).ok().flatten()
}

/// Split after the first `n` characters (or at the end of a shorter string)
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    let idx = s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx);
    s.split_at(idx)
}

/// Character width of timestamps rendered with `format`
fn timestamp_width(format: &str) -> Result<usize> {
    use std::fmt::Write;

    let reference = NaiveDate::from_ymd_opt(2000, 12, 31)
        .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
        .ok_or_else(|| LogPagerError::other("invalid reference timestamp"))?;

    let mut rendered = String::new();
    write!(rendered, "{}", reference.format(format)).map_err(|_| {
        LogPagerError::config(format!("Invalid timestamp format `{format}`"))
    })?;
    Ok(rendered.chars().count())
}
