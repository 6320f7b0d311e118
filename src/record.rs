//! Decoded log records.

use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Log severity, from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token is not one of the six level names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level `{0}`")]
pub struct UnknownLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

impl PartialEq<&str> for LogLevel {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// One log event, possibly spanning several physical lines
///
/// Records are read-only once built; the body always holds at least the first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    start_line: u64,
    timestamp: Option<NaiveDateTime>,
    level: LogLevel,
    thread_name: String,
    logger_name: String,
    body_lines: Vec<String>,
    expand_required: bool,
}

impl LogRecord {
    /// Build a record from the free text of its first line and its continuation lines
    pub fn new(
        start_line: u64,
        timestamp: Option<NaiveDateTime>,
        level: LogLevel,
        thread_name: impl Into<String>,
        logger_name: impl Into<String>,
        message: impl Into<String>,
        continuation: Vec<String>,
    ) -> Self {
        let mut body_lines = Vec::with_capacity(continuation.len() + 1);
        body_lines.push(message.into());
        body_lines.extend(continuation);

        Self {
            start_line,
            timestamp,
            level,
            thread_name: thread_name.into(),
            logger_name: logger_name.into(),
            body_lines,
            expand_required: false,
        }
    }

    pub fn with_expand_required(mut self, expand_required: bool) -> Self {
        self.expand_required = expand_required;
        self
    }

    pub fn with_start_line(mut self, start_line: u64) -> Self {
        self.start_line = start_line;
        self
    }

    /// 1-based line number of the first physical line, 0 when unknown
    pub fn start_line(&self) -> u64 {
        self.start_line
    }

    /// `None` when the leading stamp does not parse with the configured format
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// Set when an active search matched a continuation line, so viewers should unfold it
    pub fn expand_required(&self) -> bool {
        self.expand_required
    }

    /// Free text of the first line
    pub fn message(&self) -> &str {
        &self.body_lines[0]
    }

    /// Every body line, first line remainder included
    pub fn full_message(&self) -> &[String] {
        &self.body_lines
    }

    /// Lines after the first one
    pub fn continuation_lines(&self) -> &[String] {
        &self.body_lines[1..]
    }

    pub fn is_multiline(&self) -> bool {
        self.body_lines.len() > 1
    }

    pub fn line_count(&self) -> usize {
        self.body_lines.len()
    }
}

/// First line in log4j layout, continuation lines below it verbatim
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.timestamp {
            Some(ts) => write!(f, "{} ", ts.format("%Y-%m-%d %H:%M:%S%.3f"))?,
            None => f.write_str("- ")?,
        }
        write!(
            f,
            "{} [{}] - {} - {}",
            self.level,
            self.thread_name,
            self.logger_name,
            self.message()
        )?;
        for line in self.continuation_lines() {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(continuation: Vec<String>) -> LogRecord {
        LogRecord::new(
            3,
            None,
            LogLevel::Warn,
            "worker-1",
            "app.Service",
            "disk almost full",
            continuation,
        )
    }

    #[test]
    fn test_level_round_trip_names() {
        for level in LogLevel::ALL {
            assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!(
            "WARNING".parse::<LogLevel>(),
            Err(UnknownLevel("WARNING".to_string()))
        );
        assert_eq!(LogLevel::Error, "ERROR");
    }

    #[test]
    fn test_level_ordering_by_severity() {
        assert!(LogLevel::Fatal < LogLevel::Error);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_single_line_record() {
        let record = record(Vec::new());

        assert_eq!(record.message(), "disk almost full");
        assert_eq!(record.line_count(), 1);
        assert!(!record.is_multiline());
        assert!(record.continuation_lines().is_empty());
        assert!(!record.expand_required());
        assert_eq!(record.start_line(), 3);
        assert_eq!(record.level(), LogLevel::Warn);
        assert_eq!(record.thread_name(), "worker-1");
        assert_eq!(record.logger_name(), "app.Service");
    }

    #[test]
    fn test_multiline_record() {
        let record = record(vec!["  at a.b()".to_string(), "  at c.d()".to_string()])
            .with_expand_required(true);

        assert_eq!(record.line_count(), 3);
        assert!(record.is_multiline());
        assert_eq!(record.full_message()[2], "  at c.d()");
        assert!(record.expand_required());
    }

    #[test]
    fn test_with_start_line_keeps_body() {
        let record = record(vec!["  at a.b()".to_string()])
            .with_expand_required(true)
            .with_start_line(40);

        assert_eq!(record.start_line(), 40);
        assert!(record.expand_required());
        assert_eq!(record.line_count(), 2);
        assert_eq!(record.message(), "disk almost full");
        assert_eq!(record.continuation_lines(), ["  at a.b()".to_string()]);
    }

    #[test]
    fn test_unknown_level_message() {
        let err = "NOTICE".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown log level `NOTICE`");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_display_in_log_layout() {
        let record = record(vec!["  at a.b()".to_string()]);
        assert_eq!(
            record.to_string(),
            "- WARN [worker-1] - app.Service - disk almost full\n  at a.b()"
        );

        let stamped = LogRecord::new(
            1,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|date| date.and_hms_milli_opt(9, 30, 5, 20)),
            LogLevel::Info,
            "main",
            "app",
            "started",
            Vec::new(),
        );
        assert_eq!(stamped.to_string(), "2024-01-01 09:30:05.020 INFO [main] - app - started");
    }
}
