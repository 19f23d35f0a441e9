//! Page-number pagination
//!
//! Every feed in the system is sliced into fixed-size pages addressed by a
//! 1-based page number taken from the `page` query parameter. Requests are
//! forgiving: anything that is not an integer yields the first page, and a
//! number outside the available range yields the last page. An empty listing
//! still has exactly one (empty) page.

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

/// Number of posts shown on a single feed page
pub const POSTS_PER_PAGE: u32 = 10;

/// A page number as requested by a client, not yet checked against the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    number: PageNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum PageNumber {
    Number(i64),
    Invalid,
}

impl PageRequest {
    /// Requests the first page
    pub fn first() -> Self {
        Self { number: PageNumber::Number(1) }
    }

    /// Requests a specific page number
    pub fn new(number: i64) -> Self {
        Self { number: PageNumber::Number(number) }
    }

    /// Parses the raw `page` query parameter
    ///
    /// A missing or non-integer value is remembered as invalid and resolves
    /// to the first page. Integers too large for `i64` still count as
    /// numbers and clamp, so they resolve to the last page.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::first(),
            Some(value) => match value.parse::<i64>() {
                Ok(number) => Self::new(number),
                Err(e) => match e.kind() {
                    IntErrorKind::PosOverflow => Self::new(i64::MAX),
                    IntErrorKind::NegOverflow => Self::new(i64::MIN),
                    _ => Self { number: PageNumber::Invalid },
                },
            },
        }
    }

    /// Returns the requested number, if one could be parsed
    pub fn number(&self) -> Option<i64> {
        match self.number {
            PageNumber::Number(n) => Some(n),
            PageNumber::Invalid => None,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// The slice of a listing selected by a resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number actually served
    pub number: u64,
    /// Total number of pages (at least 1)
    pub num_pages: u64,
    /// Number of rows to skip
    pub offset: u64,
    /// Maximum number of rows on this page
    pub limit: u64,
    /// Total number of rows in the listing
    pub total: u64,
}

/// Resolves page requests against a listing size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u32,
}

impl Paginator {
    /// Creates a paginator with the given page size (clamped to at least 1)
    pub fn new(per_page: u32) -> Self {
        Self { per_page: per_page.max(1) }
    }

    /// Returns the page size
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of pages needed for `total` rows
    pub fn num_pages(&self, total: u64) -> u64 {
        let per_page = u64::from(self.per_page);
        total.div_ceil(per_page).max(1)
    }

    /// Resolves a request into the window that should be served
    ///
    /// # Arguments
    ///
    /// * `request` - The page requested by the client
    /// * `total` - The number of rows in the listing
    pub fn resolve(&self, request: PageRequest, total: u64) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = match request.number() {
            None => 1,
            Some(n) if n < 1 => num_pages,
            Some(n) => (n as u64).min(num_pages),
        };
        let per_page = u64::from(self.per_page);

        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * per_page,
            limit: per_page,
            total,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

/// One page of a listing together with its position metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based number of this page
    pub number: u64,
    /// Total number of pages
    pub num_pages: u64,
    /// Total number of items across all pages
    pub total: u64,
    /// Page size
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Builds a page from the rows fetched for `window`
    pub fn from_window(items: Vec<T>, window: PageWindow, per_page: u32) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total: window.total,
            per_page,
        }
    }

    /// Slices an already materialized listing
    pub fn from_slice(all: Vec<T>, paginator: Paginator, request: PageRequest) -> Self {
        let window = paginator.resolve(request, all.len() as u64);
        let items = all
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect();
        Self::from_window(items, window, paginator.per_page())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page (0 when empty)
    pub fn start_index(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            (self.number - 1) * u64::from(self.per_page) + 1
        }
    }

    /// Converts the items while keeping the page metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_falls_back_to_first_page() {
        assert_eq!(PageRequest::parse(None).number(), Some(1));
        assert_eq!(PageRequest::parse(Some("")).number(), Some(1));
        assert_eq!(PageRequest::parse(Some(" 3 ")).number(), Some(3));
        assert_eq!(PageRequest::parse(Some("abc")).number(), None);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let window = Paginator::default().resolve(PageRequest::first(), 0);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn test_out_of_range_resolves_to_last_page() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.resolve(PageRequest::new(99), 13).number, 2);
        assert_eq!(paginator.resolve(PageRequest::new(0), 13).number, 2);
        assert_eq!(paginator.resolve(PageRequest::parse(Some("x")), 13).number, 1);
    }
}
