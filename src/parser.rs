//! Record parsing and navigation.
//!
//! Layers, bottom-up:
//!
//! - [`assembler`] - groups physical lines into records at boundary lines
//! - [`position_index`] - ordinal to file position cache
//! - [`navigator`] - ordinal and raw-offset cursors over assembled records
//! - [`decoder`] - splits a record's first line into its fields
//! - [`search`] - literal and regex match predicate
//! - [`log_file_parser`] - the [`LogPager`](crate::pager::LogPager) implementation on top

pub mod assembler;
pub mod decoder;
pub mod log_file_parser;
pub mod navigator;
pub mod position_index;
pub mod search;

pub use log_file_parser::LogFileParser;
pub use position_index::{Position, PositionIndex};
pub use search::SearchExpression;
