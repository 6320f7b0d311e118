//! In-memory [`LogPager`] for smoke tests and demos.
//!
//! [`FixtureLogSource`] cycles through a fixed list of records. It ignores search
//! expressions and directions; every operation returns the next `page_size` records of the
//! cycle, renumbered from the anchor.

use crate::error::Result;
use crate::page::Page;
use crate::pager::{Anchor, LogPager};
use crate::record::{LogLevel, LogRecord};
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Default)]
pub struct FixtureLogSource {
    records: Vec<LogRecord>,
}

impl FixtureLogSource {
    pub fn new(records: Vec<LogRecord>) -> Self {
        Self { records }
    }

    /// A short canned log: a service starting up, one failure with a stack trace
    pub fn demo() -> Self {
        const LOGGER: &str = "demo.OrderService";
        let entries: [(LogLevel, &str, &[&str]); 8] = [
            (LogLevel::Info, "starting order service v2.3.1", &[]),
            (LogLevel::Debug, "loaded 42 routes from routes.toml", &[]),
            (LogLevel::Info, "listening on 0.0.0.0:8080", &[]),
            (LogLevel::Trace, "GET /orders/1881 -> 200 (3 ms)", &[]),
            (LogLevel::Warn, "slow query on orders_by_customer (1204 ms)", &[]),
            (
                LogLevel::Error,
                "failed to settle order 1882",
                &[
                    "java.net.SocketTimeoutException: Read timed out",
                    "\tat demo.PaymentClient.settle(PaymentClient.java:118)",
                    "\tat demo.OrderService.close(OrderService.java:64)",
                ],
            ),
            (LogLevel::Info, "retrying order 1882 in 5s", &[]),
            (LogLevel::Fatal, "payment gateway unreachable, shutting down", &[]),
        ];

        let records = entries
            .iter()
            .enumerate()
            .map(|(i, (level, message, continuation))| {
                LogRecord::new(
                    i as u64 + 1,
                    demo_timestamp(i as u32),
                    *level,
                    "main",
                    LOGGER,
                    *message,
                    continuation.iter().map(|line| line.to_string()).collect(),
                )
            })
            .collect();

        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn cycle(&self, anchor: Anchor, page_size: usize) -> Page<LogRecord> {
        let first = anchor.ordinal().unwrap_or(0);
        let data = self
            .records
            .iter()
            .cycle()
            .take(page_size)
            .zip(first + 1..)
            .map(|(record, start_line)| record.clone().with_start_line(start_line))
            .collect();
        Page::new(data, anchor)
    }
}

fn demo_timestamp(second: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|date| date.and_hms_milli_opt(9, 30, second, 0))
}

impl LogPager for FixtureLogSource {
    fn next_page(&mut self, anchor: Anchor, page_size: usize) -> Result<Page<LogRecord>> {
        Ok(self.cycle(anchor, page_size))
    }

    fn prev_page(&mut self, anchor: Anchor, page_size: usize) -> Result<Page<LogRecord>> {
        Ok(self.cycle(anchor, page_size))
    }

    fn find_next(
        &mut self,
        _expression: &str,
        _use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        Ok(self.cycle(anchor, page_size))
    }

    fn find_prev(
        &mut self,
        _expression: &str,
        _use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        Ok(self.cycle(anchor, page_size))
    }

    fn filter_next(
        &mut self,
        _expression: &str,
        _use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        Ok(self.cycle(anchor, page_size))
    }

    fn filter_prev(
        &mut self,
        _expression: &str,
        _use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        Ok(self.cycle(anchor, page_size))
    }
}
