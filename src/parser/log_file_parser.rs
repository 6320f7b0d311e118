//! File-backed [`LogPager`] implementation.
//!
//! [`LogFileParser`] opens one log file at construction and keeps it for its whole lifetime.
//! Every paging, search and filter operation goes through the same steps:
//!
//! 1. Compile the search expression (invalid patterns fail before the cursor moves)
//! 2. Resolve the anchor to a cursor (see [`Navigator`])
//! 3. Read records forward or backward, decoding and matching each one
//! 4. Record the raw byte bounds of what was emitted, for later [`Anchor::Resume`] calls

use crate::config::ParserConfig;
use crate::error::{DecodeError, LogPagerError, Result};
use crate::file_handler::{ByteSource, FileSourceFactory, LineReader};
use crate::page::Page;
use crate::pager::{Anchor, LogPager};
use crate::parser::assembler::RecordAssembler;
use crate::parser::decoder::RecordDecoder;
use crate::parser::navigator::{Navigator, RawRecord};
use crate::parser::position_index::Position;
use crate::parser::search::SearchExpression;
use crate::record::LogRecord;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Raw byte range covered by the last non-empty page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageBounds {
    begin: u64,
    end: u64,
}

/// A record read from the file, decoded and checked against the current expression
struct Entry {
    start: u64,
    end: u64,
    matched: bool,
    decoded: std::result::Result<LogRecord, DecodeError>,
}

/// Accumulates the emitted entries of one operation
struct PageBuilder {
    anchor: Anchor,
    records: Vec<LogRecord>,
    failures: Vec<DecodeError>,
    covered: Option<PageBounds>,
}

impl PageBuilder {
    fn new(anchor: Anchor) -> Self {
        Self {
            anchor,
            records: Vec::new(),
            failures: Vec::new(),
            covered: None,
        }
    }

    /// Decoded records collected so far; failures do not count towards the page size
    fn len(&self) -> usize {
        self.records.len()
    }

    fn has_entries(&self) -> bool {
        self.covered.is_some()
    }

    fn push(&mut self, entry: Entry) {
        self.covered = Some(match self.covered {
            Some(bounds) => PageBounds {
                begin: bounds.begin.min(entry.start),
                end: bounds.end.max(entry.end),
            },
            None => PageBounds {
                begin: entry.start,
                end: entry.end,
            },
        });

        match entry.decoded {
            Ok(record) => self.records.push(record),
            Err(failure) => self.failures.push(failure),
        }
    }

    /// Build the page; entries pushed while reading backward are put back in file order
    fn finish(mut self, direction: Direction, bounds: &mut PageBounds) -> Page<LogRecord> {
        if direction == Direction::Backward {
            self.records.reverse();
            self.failures.reverse();
        }
        if let Some(covered) = self.covered {
            *bounds = covered;
        }
        Page::new(self.records, self.anchor).with_failures(self.failures)
    }
}

/// Everything except the byte source, so operations can borrow the file and mutate the
/// navigation state at the same time
#[derive(Debug)]
struct Engine {
    navigator: Navigator,
    decoder: RecordDecoder,
    bounds: PageBounds,
}

impl Engine {
    fn resolve(&mut self, reader: &LineReader<'_>, anchor: Anchor, direction: Direction) -> bool {
        match anchor {
            Anchor::Ordinal(n) => self.navigator.seek_ordinal(reader, n),
            Anchor::Resume => {
                let offset = match direction {
                    Direction::Forward => self.bounds.end,
                    Direction::Backward => self.bounds.begin,
                };
                log::debug!("resuming {direction:?} from byte {offset}");
                self.navigator.seek_offset(offset);
                true
            }
        }
    }

    fn entry(&self, raw: RawRecord, expression: &SearchExpression) -> Entry {
        let decoded = self.decoder.decode(&raw).map(|record| {
            let expand = expression.is_active()
                && record.is_multiline()
                && expression.matches_any(record.continuation_lines());
            record.with_expand_required(expand)
        });

        let matched = match &decoded {
            Ok(record) => expression.matches_any(record.full_message()),
            Err(failure) => {
                log::debug!("{failure}");
                expression.matches_any(&raw.lines)
            }
        };

        Entry {
            start: raw.start,
            end: raw.end,
            matched,
            decoded,
        }
    }

    fn next_entry(
        &mut self,
        reader: &LineReader<'_>,
        expression: &SearchExpression,
    ) -> Option<Entry> {
        let raw = self.navigator.next_record(reader)?;
        Some(self.entry(raw, expression))
    }

    fn prev_entry(
        &mut self,
        reader: &LineReader<'_>,
        expression: &SearchExpression,
    ) -> Option<Entry> {
        let raw = self.navigator.prev_record(reader)?;
        Some(self.entry(raw, expression))
    }

    /// Emit up to `size` records forward from the cursor, unconditionally
    fn fill_forward(
        &mut self,
        reader: &LineReader<'_>,
        expression: &SearchExpression,
        page: &mut PageBuilder,
        size: usize,
    ) {
        while page.len() < size {
            match self.next_entry(reader, expression) {
                Some(entry) => page.push(entry),
                None => break,
            }
        }
    }

    fn find_next(
        &mut self,
        reader: &LineReader<'_>,
        expression: &SearchExpression,
        anchor: Anchor,
        size: usize,
    ) -> Page<LogRecord> {
        let mut page = PageBuilder::new(anchor);
        if size == 0 || !self.resolve(reader, anchor, Direction::Forward) {
            return page.finish(Direction::Forward, &mut self.bounds);
        }

        while let Some(entry) = self.next_entry(reader, expression) {
            if entry.matched {
                page.push(entry);
                break;
            }
        }

        if page.has_entries() {
            self.fill_forward(reader, expression, &mut page, size);
        }
        page.finish(Direction::Forward, &mut self.bounds)
    }

    fn find_prev(
        &mut self,
        reader: &LineReader<'_>,
        expression: &SearchExpression,
        anchor: Anchor,
        size: usize,
    ) -> Page<LogRecord> {
        let mut page = PageBuilder::new(anchor);
        if size == 0 || !self.resolve(reader, anchor, Direction::Backward) {
            return page.finish(Direction::Forward, &mut self.bounds);
        }

        let mut found = false;
        while let Some(entry) = self.prev_entry(reader, expression) {
            if entry.matched {
                found = true;
                break;
            }
        }

        // The cursor now sits at the start of the match, so reading forward emits it first
        if found {
            self.fill_forward(reader, expression, &mut page, size);
        }
        page.finish(Direction::Forward, &mut self.bounds)
    }

    fn filter_next(
        &mut self,
        reader: &LineReader<'_>,
        expression: &SearchExpression,
        anchor: Anchor,
        size: usize,
    ) -> Page<LogRecord> {
        let mut page = PageBuilder::new(anchor);
        if size == 0 || !self.resolve(reader, anchor, Direction::Forward) {
            return page.finish(Direction::Forward, &mut self.bounds);
        }

        while page.len() < size {
            match self.next_entry(reader, expression) {
                Some(entry) if entry.matched => page.push(entry),
                Some(_) => {}
                None => break,
            }
        }
        page.finish(Direction::Forward, &mut self.bounds)
    }

    fn filter_prev(
        &mut self,
        reader: &LineReader<'_>,
        expression: &SearchExpression,
        anchor: Anchor,
        size: usize,
    ) -> Page<LogRecord> {
        let mut page = PageBuilder::new(anchor);
        if size == 0 || !self.resolve(reader, anchor, Direction::Backward) {
            return page.finish(Direction::Backward, &mut self.bounds);
        }

        while page.len() < size {
            match self.prev_entry(reader, expression) {
                Some(entry) if entry.matched => page.push(entry),
                Some(_) => {}
                None => break,
            }
        }
        page.finish(Direction::Backward, &mut self.bounds)
    }
}

/// Paged navigation over one log file
///
/// # Example
/// ```no_run
/// use logpager::{Anchor, LogFileParser, LogPager};
///
/// let mut parser = LogFileParser::open("app.log")?;
/// let first = parser.next_page(Anchor::Ordinal(0), 50)?;
/// let errors = parser.filter_next("ERROR", false, Anchor::Ordinal(0), 50)?;
/// let tail = parser.last_page(50)?;
/// # Ok::<(), logpager::LogPagerError>(())
/// ```
#[derive(Debug)]
pub struct LogFileParser {
    path: PathBuf,
    source: ByteSource,
    engine: Engine,
}

impl LogFileParser {
    /// Open `path` with the default log4j layout
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(path, &ParserConfig::default())
    }

    /// Open `path` with custom boundary and timestamp settings
    ///
    /// # Errors
    /// * `FileNotFound` / `NotAFile` / `FileError` if the file cannot be opened
    /// * `InvalidPattern` if the boundary pattern does not compile
    /// * `ConfigError` if the timestamp format is invalid
    /// * `NoRecords` if no line of the file matches the boundary pattern
    pub fn with_config<P: AsRef<Path>>(path: P, config: &ParserConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let assembler = RecordAssembler::new(&config.boundary_pattern)?;
        let decoder = RecordDecoder::new(&config.timestamp_format)?;
        let source = FileSourceFactory::open(&path, config)?;

        let navigator = Navigator::new(&LineReader::new(source.as_bytes()), assembler)
            .ok_or_else(|| LogPagerError::NoRecords { path: path.clone() })?;

        log::debug!(
            "opened {} ({} bytes, first record at line {})",
            path.display(),
            source.len(),
            navigator.origin().line
        );

        let eof = source.len();
        Ok(Self {
            path,
            source,
            engine: Engine {
                navigator,
                decoder,
                bounds: PageBounds {
                    begin: eof,
                    end: eof,
                },
            },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_size(&self) -> u64 {
        self.source.len()
    }

    /// Number of record starts discovered so far
    pub fn indexed_records(&self) -> u64 {
        self.engine.navigator.index().len()
    }

    /// Raw byte range `(begin, end)` covered by the last non-empty page
    pub fn page_bounds(&self) -> (u64, u64) {
        (self.engine.bounds.begin, self.engine.bounds.end)
    }

    /// The last `page_size` records of the file
    pub fn last_page(&mut self, page_size: usize) -> Result<Page<LogRecord>> {
        let eof = self.source.len();
        self.engine.bounds = PageBounds {
            begin: eof,
            end: eof,
        };
        self.prev_page(Anchor::Resume, page_size)
    }

    /// Start position of record `ordinal` (1-based)
    ///
    /// Extends the index up to `ordinal` if needed, which moves the reading cursor.
    ///
    /// # Returns
    /// * `None` for ordinal 0 or past the last record
    pub fn locate(&mut self, ordinal: u64) -> Option<Position> {
        if let Some(position) = self.engine.navigator.index().lookup(ordinal) {
            return Some(position);
        }
        if ordinal == 0 {
            return None;
        }

        let reader = LineReader::new(self.source.as_bytes());
        self.engine.navigator.seek_ordinal(&reader, ordinal);
        self.engine.navigator.index().lookup(ordinal)
    }
}

impl LogPager for LogFileParser {
    fn next_page(&mut self, anchor: Anchor, page_size: usize) -> Result<Page<LogRecord>> {
        self.find_next("", false, anchor, page_size)
    }

    fn prev_page(&mut self, anchor: Anchor, page_size: usize) -> Result<Page<LogRecord>> {
        if page_size == 0 {
            return Ok(Page::empty(anchor));
        }
        let reader = LineReader::new(self.source.as_bytes());
        let any = SearchExpression::Any;

        let page = match anchor {
            Anchor::Resume => self.engine.filter_prev(&reader, &any, anchor, page_size),
            Anchor::Ordinal(n) if page_size as u64 > n => {
                let mut page = self.engine.find_next(&reader, &any, Anchor::Ordinal(0), n as usize);
                page.offset = anchor;
                page
            }
            Anchor::Ordinal(n) => {
                let start = Anchor::Ordinal(n - (page_size as u64 - 1));
                let mut page = self.engine.find_prev(&reader, &any, start, page_size);
                page.offset = anchor;
                page
            }
        };
        Ok(page)
    }

    fn find_next(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        let expression = SearchExpression::compile(expression, use_regex)?;
        let reader = LineReader::new(self.source.as_bytes());
        Ok(self.engine.find_next(&reader, &expression, anchor, page_size))
    }

    fn find_prev(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        let expression = SearchExpression::compile(expression, use_regex)?;
        let reader = LineReader::new(self.source.as_bytes());
        Ok(self.engine.find_prev(&reader, &expression, anchor, page_size))
    }

    fn filter_next(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        let expression = SearchExpression::compile(expression, use_regex)?;
        let reader = LineReader::new(self.source.as_bytes());
        Ok(self.engine.filter_next(&reader, &expression, anchor, page_size))
    }

    fn filter_prev(
        &mut self,
        expression: &str,
        use_regex: bool,
        anchor: Anchor,
        page_size: usize,
    ) -> Result<Page<LogRecord>> {
        let expression = SearchExpression::compile(expression, use_regex)?;
        let reader = LineReader::new(self.source.as_bytes());
        Ok(self.engine.filter_prev(&reader, &expression, anchor, page_size))
    }
}
