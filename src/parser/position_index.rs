//! Record ordinal to file position index
//!
//! Grows monotonically while the file is read forward in ordinal mode, so that revisiting
//! any record already seen is a single vector lookup instead of a re-scan.

/// Where a record starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset of the record's first line
    pub offset: u64,
    /// 1-based line number of the record's first line
    pub line: u64,
}

/// Append-only index of record start positions
///
/// Ordinals are 1-based and assigned densely in discovery order: `entries[n - 1]` holds
/// the start of record `n`. Both offsets and line numbers are strictly increasing.
#[derive(Debug, Default, Clone)]
pub struct PositionIndex {
    entries: Vec<Position>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of `ordinal`
    ///
    /// Only the next unindexed ordinal is accepted, and only if it lies strictly after
    /// the last entry. Re-visiting an indexed record is a no-op.
    ///
    /// # Returns
    /// * true if the entry was stored
    pub fn append(&mut self, ordinal: u64, position: Position) -> bool {
        if ordinal != self.len() + 1 {
            return false;
        }

        if let Some(last) = self.entries.last() {
            if position.offset <= last.offset || position.line <= last.line {
                log::warn!(
                    "refusing non-monotonic index entry #{ordinal} at {position:?} after {last:?}"
                );
                return false;
            }
        }

        self.entries.push(position);
        true
    }

    /// Start of record `ordinal`, if it has been indexed
    pub fn lookup(&self, ordinal: u64) -> Option<Position> {
        let idx = usize::try_from(ordinal.checked_sub(1)?).ok()?;
        self.entries.get(idx).copied()
    }

    /// Highest indexed ordinal and its position
    pub fn last(&self) -> Option<(u64, Position)> {
        self.entries
            .last()
            .map(|position| (self.entries.len() as u64, *position))
    }

    /// Number of indexed records
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(offset: u64, line: u64) -> Position {
        Position { offset, line }
    }

    #[test]
    fn test_new_index_is_empty() {
        let index = PositionIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.lookup(0), None);
        assert_eq!(index.lookup(1), None);
        assert_eq!(index.last(), None);
    }

    #[test]
    fn test_append_and_lookup() {
        let mut index = PositionIndex::new();
        assert!(index.append(1, pos(0, 1)));
        assert!(index.append(2, pos(40, 2)));
        assert!(index.append(3, pos(95, 5)));

        assert_eq!(index.len(), 3);
        assert_eq!(index.lookup(2), Some(pos(40, 2)));
        assert_eq!(index.lookup(0), None);
        assert_eq!(index.lookup(4), None);
        assert_eq!(index.last(), Some((3, pos(95, 5))));
    }

    #[test]
    fn test_revisit_is_idempotent() {
        let mut index = PositionIndex::new();
        index.append(1, pos(0, 1));
        index.append(2, pos(40, 2));

        assert!(!index.append(1, pos(0, 1)));
        assert!(!index.append(2, pos(40, 2)));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_rejects_gaps_and_non_monotonic_entries() {
        let mut index = PositionIndex::new();
        index.append(1, pos(10, 3));

        assert!(!index.append(3, pos(50, 6)));
        assert!(!index.append(2, pos(10, 4)));
        assert!(!index.append(2, pos(20, 3)));
        assert!(index.append(2, pos(20, 4)));
    }
}
