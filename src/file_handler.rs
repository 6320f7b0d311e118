//! File access with memory mapping and byte-offset line reading.
//!
//! The log file is opened exactly once, by [`FileSourceFactory`], and kept alive for the
//! lifetime of the parser as a [`ByteSource`]. Everything above this layer navigates by
//! byte offsets through [`LineReader`].

pub mod factory;
pub mod line_reader;
pub mod source;
pub mod validation;

pub use factory::FileSourceFactory;
pub use line_reader::{LineReader, RawLine};
pub use source::ByteSource;
pub use validation::validate_file_path;
