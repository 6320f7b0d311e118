//! Cursor resolution and movement
//!
//! The navigator owns the reading cursor, the record assembler (with its lookahead line)
//! and the position index. It has two addressing modes, modelled as the [`Cursor`] enum:
//!
//! - [`OrdinalCursor`]: knows which record it sits before and which line it is on. Every
//!   forward step records the start of the record in the index; backward steps jump
//!   through the index.
//! - [`OffsetCursor`]: knows only a byte offset. Used to continue from wherever the last
//!   page ended, including the end of the file, without knowing how many records precede
//!   it. Never touches the index; reported ordinals and line numbers are 0.

use crate::file_handler::LineReader;
use crate::parser::assembler::{AssembledRecord, RecordAssembler};
use crate::parser::position_index::{Position, PositionIndex};

/// An assembled record plus where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based record ordinal, 0 in raw-offset mode
    pub ordinal: u64,
    /// 1-based line number of the first line, 0 in raw-offset mode
    pub start_line: u64,
    pub start: u64,
    pub end: u64,
    pub lines: Vec<String>,
}

impl RawRecord {
    fn unnumbered(assembled: AssembledRecord) -> Self {
        Self {
            ordinal: 0,
            start_line: 0,
            start: assembled.start,
            end: assembled.end,
            lines: assembled.lines,
        }
    }
}

/// Cursor positioned at the start of record `next_ordinal`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalCursor {
    pub position: Position,
    pub next_ordinal: u64,
}

impl OrdinalCursor {
    fn advance(
        &mut self,
        reader: &LineReader<'_>,
        assembler: &mut RecordAssembler,
        index: &mut PositionIndex,
    ) -> Option<RawRecord> {
        let assembled = assembler.read_forward(reader, self.position.offset)?;
        index.append(self.next_ordinal, self.position);

        let record = RawRecord {
            ordinal: self.next_ordinal,
            start_line: self.position.line,
            start: assembled.start,
            end: assembled.end,
            lines: assembled.lines,
        };

        self.position = Position {
            offset: record.end,
            line: self.position.line + record.lines.len() as u64,
        };
        self.next_ordinal += 1;
        log::trace!("read record #{} at {}", record.ordinal, record.start);
        Some(record)
    }

    fn retreat(
        &mut self,
        reader: &LineReader<'_>,
        assembler: &mut RecordAssembler,
        index: &mut PositionIndex,
    ) -> Option<RawRecord> {
        let ordinal = self.next_ordinal.checked_sub(1).filter(|n| *n > 0)?;
        let position = index.lookup(ordinal)?;

        let mut probe = OrdinalCursor {
            position,
            next_ordinal: ordinal,
        };
        let record = probe.advance(reader, assembler, index)?;

        self.position = position;
        self.next_ordinal = ordinal;
        Some(record)
    }
}

/// Cursor positioned at a raw byte offset (a record start or EOF)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor {
    pub offset: u64,
}

impl OffsetCursor {
    fn advance(
        &mut self,
        reader: &LineReader<'_>,
        assembler: &mut RecordAssembler,
    ) -> Option<RawRecord> {
        let assembled = assembler.read_forward(reader, self.offset)?;
        self.offset = assembled.end;
        Some(RawRecord::unnumbered(assembled))
    }

    fn retreat(
        &mut self,
        reader: &LineReader<'_>,
        assembler: &RecordAssembler,
    ) -> Option<RawRecord> {
        let assembled = assembler.read_backward(reader, self.offset)?;
        self.offset = assembled.start;
        Some(RawRecord::unnumbered(assembled))
    }
}

/// The two addressing modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Ordinal(OrdinalCursor),
    Offset(OffsetCursor),
}

impl Cursor {
    pub fn offset(&self) -> u64 {
        match self {
            Cursor::Ordinal(cursor) => cursor.position.offset,
            Cursor::Offset(cursor) => cursor.offset,
        }
    }
}

/// Navigation engine over one file
#[derive(Debug)]
pub struct Navigator {
    assembler: RecordAssembler,
    index: PositionIndex,
    /// Start of the first record in the file
    origin: Position,
    cursor: Cursor,
}

impl Navigator {
    /// Build a navigator positioned before the first record
    ///
    /// # Returns
    /// * `None` if no line of the file matches the boundary pattern
    pub fn new(reader: &LineReader<'_>, mut assembler: RecordAssembler) -> Option<Self> {
        let origin = assembler.find_first_boundary(reader)?;
        Some(Self {
            assembler,
            index: PositionIndex::new(),
            origin,
            cursor: Cursor::Ordinal(OrdinalCursor {
                position: origin,
                next_ordinal: 1,
            }),
        })
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Place the cursor right after the first `anchor` records
    ///
    /// Indexed positions are used directly; otherwise the file is replayed forward from
    /// the last indexed record, extending the index on the way.
    ///
    /// # Returns
    /// * false if EOF is reached before `anchor` records have been read
    pub fn seek_ordinal(&mut self, reader: &LineReader<'_>, anchor: u64) -> bool {
        self.assembler.reset();
        let target = anchor.saturating_add(1);

        if let Some(position) = self.index.lookup(target) {
            self.cursor = Cursor::Ordinal(OrdinalCursor {
                position,
                next_ordinal: target,
            });
            return true;
        }

        let mut cursor = match self.index.last() {
            Some((ordinal, position)) => OrdinalCursor {
                position,
                next_ordinal: ordinal,
            },
            None => OrdinalCursor {
                position: self.origin,
                next_ordinal: 1,
            },
        };
        log::debug!(
            "replaying from record #{} to reach #{}",
            cursor.next_ordinal,
            target
        );

        let mut resolved = true;
        while cursor.next_ordinal < target {
            if cursor
                .advance(reader, &mut self.assembler, &mut self.index)
                .is_none()
            {
                log::debug!(
                    "EOF after {} records while seeking past #{}",
                    cursor.next_ordinal - 1,
                    anchor
                );
                resolved = false;
                break;
            }
        }

        self.cursor = Cursor::Ordinal(cursor);
        resolved
    }

    /// Switch to raw-offset mode at `offset`
    pub fn seek_offset(&mut self, offset: u64) {
        self.cursor = Cursor::Offset(OffsetCursor { offset });
    }

    /// Read the record under the cursor and move past it
    pub fn next_record(&mut self, reader: &LineReader<'_>) -> Option<RawRecord> {
        match &mut self.cursor {
            Cursor::Ordinal(cursor) => cursor.advance(reader, &mut self.assembler, &mut self.index),
            Cursor::Offset(cursor) => cursor.advance(reader, &mut self.assembler),
        }
    }

    /// Read the record before the cursor and move to its start
    pub fn prev_record(&mut self, reader: &LineReader<'_>) -> Option<RawRecord> {
        match &mut self.cursor {
            Cursor::Ordinal(cursor) => cursor.retreat(reader, &mut self.assembler, &mut self.index),
            Cursor::Offset(cursor) => cursor.retreat(reader, &self.assembler),
        }
    }
}
