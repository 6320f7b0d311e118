//! Generic page container returned by every paging operation.

use crate::error::DecodeError;
use crate::pager::Anchor;
use std::fmt;

/// One page of results
///
/// `page_size` always equals `data.len()`. Records that could not be decoded while the
/// page was produced are reported in `failures` instead of aborting the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Anchor the page was requested with
    pub offset: Anchor,
    pub current_page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub failures: Vec<DecodeError>,
}

impl<T> Page<T> {
    /// A page holding `data`, describing itself as page 1 of 1
    pub fn new(data: Vec<T>, offset: Anchor) -> Self {
        let len = data.len() as u64;
        let pages = u64::from(len > 0);
        Self {
            data,
            offset,
            current_page: pages,
            page_size: len,
            total_pages: pages,
            total_count: len,
            failures: Vec::new(),
        }
    }

    /// The page returned at BOF/EOF or when nothing matched
    pub fn empty(offset: Anchor) -> Self {
        Self::new(Vec::new(), offset)
    }

    pub fn with_failures(mut self, failures: Vec<DecodeError>) -> Self {
        self.failures = failures;
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Transform every element, keeping the page metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            offset: self.offset,
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_count: self.total_count,
            failures: self.failures,
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Metadata header, then one element per line
impl<T: fmt::Display> fmt::Display for Page<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {}/{} from {}: {} of {} items",
            self.current_page, self.total_pages, self.offset, self.page_size, self.total_count
        )?;
        if !self.failures.is_empty() {
            write!(f, ", {} undecodable", self.failures.len())?;
        }
        for item in &self.data {
            write!(f, "\n{item}")?;
        }
        Ok(())
    }
}
