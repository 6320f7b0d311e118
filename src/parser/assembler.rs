//! Multi-line record assembly
//!
//! A record is a boundary line followed by every non-boundary line up to the next boundary
//! or EOF. Finding where a record ends requires reading one line past it; that lookahead
//! line is kept as the "orphan" so the next forward read does not fetch it again.

use crate::error::{LogPagerError, Result};
use crate::file_handler::{LineReader, RawLine};
use crate::parser::position_index::Position;
use grep_matcher::Matcher;
use grep_regex::RegexMatcher;

/// Consecutive lines forming one record, before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledRecord {
    /// Offset of the boundary line
    pub start: u64,
    /// Offset right after the last line of the record
    pub end: u64,
    /// Physical lines in file order, boundary line first
    pub lines: Vec<String>,
}

/// Groups lines into records using the boundary pattern
#[derive(Debug)]
pub struct RecordAssembler {
    boundary: RegexMatcher,
    orphan: Option<RawLine>,
}

impl RecordAssembler {
    pub fn new(boundary_pattern: &str) -> Result<Self> {
        let boundary = RegexMatcher::new(boundary_pattern)
            .map_err(|e| LogPagerError::invalid_pattern(boundary_pattern, e))?;
        Ok(Self {
            boundary,
            orphan: None,
        })
    }

    pub fn is_boundary(&self, line: &str) -> bool {
        self.boundary.is_match(line.as_bytes()).unwrap_or(false)
    }

    /// Drop the cached lookahead line
    pub fn reset(&mut self) {
        self.orphan = None;
    }

    /// Offset of the cached lookahead line, if any
    pub fn orphan_offset(&self) -> Option<u64> {
        self.orphan.as_ref().map(|line| line.start)
    }

    /// Locate the first boundary line of the file, scanning from byte 0
    ///
    /// Lines before it (a file cut mid-record) are skipped. The boundary line itself is
    /// cached as the orphan.
    pub fn find_first_boundary(&mut self, reader: &LineReader<'_>) -> Option<Position> {
        let mut offset = 0;
        let mut line_number = 1;

        while let Some(line) = reader.read_forward(offset) {
            if self.is_boundary(&line.text) {
                if line_number > 1 {
                    log::warn!(
                        "skipped {} line(s) before the first record boundary",
                        line_number - 1
                    );
                }
                let position = Position {
                    offset: line.start,
                    line: line_number,
                };
                self.orphan = Some(line);
                return Some(position);
            }
            offset = line.next;
            line_number += 1;
        }

        None
    }

    /// Assemble the record starting at `offset`
    ///
    /// The caller guarantees that a boundary line starts at `offset`.
    ///
    /// # Returns
    /// * The record; the following boundary line (if any) is cached as the orphan
    /// * `None` at EOF
    pub fn read_forward(
        &mut self,
        reader: &LineReader<'_>,
        offset: u64,
    ) -> Option<AssembledRecord> {
        let first = match self.orphan.take() {
            Some(line) if line.start == offset => line,
            _ => reader.read_forward(offset)?,
        };

        let start = first.start;
        let mut end = first.next;
        let mut lines = vec![first.text];

        while let Some(line) = reader.read_forward(end) {
            if self.is_boundary(&line.text) {
                self.orphan = Some(line);
                break;
            }
            end = line.next;
            lines.push(line.text);
        }

        Some(AssembledRecord { start, end, lines })
    }

    /// Assemble the record that ends right before `offset`
    ///
    /// # Returns
    /// * The record, with its lines in file order
    /// * `None` if BOF is reached before any boundary line
    pub fn read_backward(&self, reader: &LineReader<'_>, offset: u64) -> Option<AssembledRecord> {
        let end = offset.min(reader.len());
        let mut cursor = end;
        let mut lines = Vec::new();

        loop {
            let line = reader.read_backward(cursor)?;
            cursor = line.start;
            let is_boundary = self.is_boundary(&line.text);
            lines.push(line.text);

            if is_boundary {
                lines.reverse();
                return Some(AssembledRecord {
                    start: cursor,
                    end,
                    lines,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BOUNDARY_PATTERN;

    const LOG: &[u8] = b"2024-01-01 00:00:00,000 INFO [t1] - X - hello\n\
2024-01-01 00:00:01,000 ERROR [t1] - X - world\n\
continuation\n\
\tat frame\n\
2024-01-01 00:00:02,000 DEBUG [t2] - Y - last\n";

    fn assembler() -> RecordAssembler {
        RecordAssembler::new(DEFAULT_BOUNDARY_PATTERN).unwrap()
    }

    #[test]
    fn test_boundary_predicate() {
        let assembler = assembler();
        assert!(assembler.is_boundary("2024-01-01 00:00:00,000 INFO [t1] - X - hello"));
        assert!(!assembler.is_boundary("continuation"));
        assert!(!assembler.is_boundary(" 2024-01-01 00:00:00,000 indented"));
    }

    #[test]
    fn test_invalid_boundary_pattern() {
        assert!(matches!(
            RecordAssembler::new("[unclosed"),
            Err(LogPagerError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_forward_assembly_groups_continuation_lines() {
        let reader = LineReader::new(LOG);
        let mut assembler = assembler();

        let first = assembler.read_forward(&reader, 0).unwrap();
        assert_eq!(first.lines.len(), 1);
        assert_eq!(assembler.orphan_offset(), Some(first.end));

        let second = assembler.read_forward(&reader, first.end).unwrap();
        assert_eq!(
            second.lines,
            vec![
                "2024-01-01 00:00:01,000 ERROR [t1] - X - world",
                "continuation",
                "\tat frame",
            ]
        );

        let third = assembler.read_forward(&reader, second.end).unwrap();
        assert_eq!(third.end, LOG.len() as u64);
        assert_eq!(assembler.orphan_offset(), None);

        assert!(assembler.read_forward(&reader, third.end).is_none());
    }

    #[test]
    fn test_stale_orphan_is_ignored() {
        let reader = LineReader::new(LOG);
        let mut assembler = assembler();

        let first = assembler.read_forward(&reader, 0).unwrap();
        // Jump back to the start while the orphan still points at record 2
        let again = assembler.read_forward(&reader, 0).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_backward_assembly_mirrors_forward() {
        let reader = LineReader::new(LOG);
        let mut forward = assembler();
        let backward = assembler();

        let mut expected = Vec::new();
        let mut offset = 0;
        while let Some(record) = forward.read_forward(&reader, offset) {
            offset = record.end;
            expected.push(record);
        }

        let mut actual = Vec::new();
        let mut offset = reader.len();
        while let Some(record) = backward.read_backward(&reader, offset) {
            offset = record.start;
            actual.push(record);
        }
        actual.reverse();

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_backward_without_boundary_reaches_bof() {
        let data = b"preamble line\nanother\n2024-01-01 00:00:00,000 INFO [t] - X - m\n";
        let reader = LineReader::new(data);
        let assembler = assembler();

        let record = assembler.read_backward(&reader, reader.len()).unwrap();
        assert_eq!(record.start, 22);
        assert!(assembler.read_backward(&reader, record.start).is_none());
    }

    #[test]
    fn test_find_first_boundary_skips_preamble() {
        let data = b"cut mid-record\n\tat frame\n2024-01-01 00:00:00,000 INFO [t] - X - m\n";
        let reader = LineReader::new(data);
        let mut assembler = assembler();

        let position = assembler.find_first_boundary(&reader).unwrap();
        assert_eq!(position, Position { offset: 25, line: 3 });
        assert_eq!(assembler.orphan_offset(), Some(25));
    }

    #[test]
    fn test_find_first_boundary_none() {
        let reader = LineReader::new(b"no\nrecords\nhere\n");
        assert!(assembler().find_first_boundary(&reader).is_none());
    }
}
