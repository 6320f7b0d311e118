//! Byte storage backing a parser instance
//!
//! A `ByteSource` owns either the whole file content or a read-only memory map of it.
//! Dropping it releases the mapping and the underlying file handle.

use memmap2::Mmap;

/// Internal byte source strategy chosen by the `FileSourceFactory`
#[derive(Debug)]
pub enum ByteSource {
    /// Content loaded entirely into memory (files below the memory threshold)
    InMemory(Vec<u8>),
    /// Content accessed via memory mapping, pages are faulted in on demand
    MemoryMapped(Mmap),
}

impl ByteSource {
    /// Get the underlying bytes as a slice regardless of storage strategy
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ByteSource::InMemory(vec) => vec.as_slice(),
            ByteSource::MemoryMapped(mmap) => &mmap[..],
        }
    }

    /// Total size in bytes
    pub fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn is_memory_mapped(&self) -> bool {
        matches!(self, ByteSource::MemoryMapped(_))
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(content: Vec<u8>) -> Self {
        ByteSource::InMemory(content)
    }
}
