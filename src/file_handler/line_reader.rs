//! Byte-offset line reader
//!
//! Reads a single line forward or backward from an explicit byte offset. `\n`, `\r` and the
//! `\r\n` pair are all accepted as one line terminator and never appear in the returned
//! text. Reaching either end of the data is reported as `None`, not as an error.

use bstr::ByteSlice;
use memchr::{memchr2, memrchr2};

/// One physical line and where it sits in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Line content without its terminator, lossily decoded as UTF-8
    pub text: String,

    /// Byte offset of the first character of the line
    pub start: u64,

    /// Byte offset right after the line terminator (start of the following line)
    pub next: u64,
}

/// Line reader borrowing the bytes of a `ByteSource`
#[derive(Debug, Clone, Copy)]
pub struct LineReader<'a> {
    bytes: &'a [u8],
}

impl<'a> LineReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Total number of bytes visible to this reader
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the line starting at `offset`
    ///
    /// # Returns
    /// * The line and the offset of the following line
    /// * `None` if `offset` is at or beyond EOF
    pub fn read_forward(&self, offset: u64) -> Option<RawLine> {
        let start = usize::try_from(offset).ok()?;
        if start >= self.bytes.len() {
            return None;
        }

        let rest = &self.bytes[start..];
        let (content_end, next) = match memchr2(b'\n', b'\r', rest) {
            Some(pos) => {
                let terminator_len = if rest[pos] == b'\r' && rest.get(pos + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                (start + pos, start + pos + terminator_len)
            }
            None => (self.bytes.len(), self.bytes.len()),
        };

        Some(RawLine {
            text: decode(&self.bytes[start..content_end]),
            start: offset,
            next: next as u64,
        })
    }

    /// Read the line that ends right before `offset`
    ///
    /// `offset` is expected to be a line start or the end of the data; larger values are
    /// clamped to the end.
    ///
    /// # Returns
    /// * The previous line; its `next` field is the (clamped) `offset`
    /// * `None` if `offset` is 0
    pub fn read_backward(&self, offset: u64) -> Option<RawLine> {
        let end = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(self.bytes.len());
        if end == 0 {
            return None;
        }

        // Classify the terminator of the previous line: `\r\n`, lone `\n`, lone `\r`, or
        // none at all when `end` is an EOF without trailing newline.
        let content_end = match self.bytes[end - 1] {
            b'\n' if end >= 2 && self.bytes[end - 2] == b'\r' => end - 2,
            b'\n' | b'\r' => end - 1,
            _ => end,
        };

        let start = memrchr2(b'\n', b'\r', &self.bytes[..content_end]).map_or(0, |pos| pos + 1);

        Some(RawLine {
            text: decode(&self.bytes[start..content_end]),
            start: start as u64,
            next: end as u64,
        })
    }
}

fn decode(bytes: &[u8]) -> String {
    bytes.to_str_lossy().into_owned()
}
