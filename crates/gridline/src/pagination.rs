//! Page windows over a sequence.
//!
//! The paginator only stores the current page and the page size. The item
//! count is passed to every call, since the sequence being paginated (the
//! filtered, sorted view) is recomputed on each access.
//!
//! Invariant: `1 <= current_page <= total_pages(len)` after every call that
//! takes `len`. When the sequence shrinks the page is clamped down; it is
//! never moved up.

use std::num::NonZeroUsize;
use std::ops::{Range, RangeInclusive};

use serde::Serialize;

/// Rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageSize {
    Limited(NonZeroUsize),
    /// Pagination disabled: everything is on page 1.
    Unbounded,
}

impl PageSize {
    /// A limited page size, or `None` for zero.
    pub fn limited(size: usize) -> Option<PageSize> {
        NonZeroUsize::new(size).map(PageSize::Limited)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Limited(NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

/// Rows per page when nothing is configured.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One page of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// 1-based page number.
    pub current_page: usize,
    pub total_pages: usize,
    /// Length of the whole sequence.
    pub total_items: usize,
    /// 0-based index of the first item within the sequence.
    pub offset: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// 1-based index of the first item on this page, or 0 when empty.
    pub fn first_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.offset + 1
        }
    }

    /// 1-based index of the last item on this page, or 0 when empty.
    pub fn last_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.offset + self.items.len()
        }
    }
}

/// Current page plus page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: PageSize,
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator::new(PageSize::default())
    }
}

impl Paginator {
    pub fn new(page_size: PageSize) -> Self {
        Paginator {
            current_page: 1,
            page_size,
        }
    }

    /// A paginator that puts everything on one page.
    pub fn unbounded() -> Self {
        Paginator::new(PageSize::Unbounded)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Changes the page size, keeping the page number when still valid.
    pub fn set_page_size(&mut self, page_size: PageSize, len: usize) {
        self.page_size = page_size;
        self.sync(len);
    }

    /// `max(1, ceil(len / page_size))`.
    pub fn total_pages(&self, len: usize) -> usize {
        match self.page_size {
            PageSize::Limited(size) => len.div_ceil(size.get()).max(1),
            PageSize::Unbounded => 1,
        }
    }

    /// Clamps the current page after the sequence length changed.
    ///
    /// Returns `true` if the page moved.
    pub fn sync(&mut self, len: usize) -> bool {
        let clamped = self.current_page.min(self.total_pages(len)).max(1);
        let moved = clamped != self.current_page;
        self.current_page = clamped;
        moved
    }

    /// Moves to page `page`. Out-of-range pages are rejected.
    pub fn set_page(&mut self, page: usize, len: usize) -> bool {
        if page == 0 || page > self.total_pages(len) {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next_page(&mut self, len: usize) -> bool {
        if self.has_next(len) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.has_prev() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.current_page < self.total_pages(len)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Page numbers for navigation buttons.
    pub fn page_numbers(&self, len: usize) -> RangeInclusive<usize> {
        1..=self.total_pages(len)
    }

    /// Index range of the current page within a sequence of `len` items.
    pub fn window(&self, len: usize) -> Range<usize> {
        match self.page_size {
            PageSize::Limited(size) => {
                let start = (self.current_page - 1).saturating_mul(size.get()).min(len);
                let end = start.saturating_add(size.get()).min(len);
                start..end
            }
            PageSize::Unbounded => 0..len,
        }
    }

    /// Copies the current page out of `items`.
    ///
    /// Does not clamp; call [`sync`](Self::sync) first when the length may
    /// have changed. A stale page past the end yields no items.
    pub fn paginate<T: Clone>(&self, items: &[T]) -> Page<T> {
        let window = self.window(items.len());
        Page {
            current_page: self.current_page,
            total_pages: self.total_pages(items.len()),
            total_items: items.len(),
            offset: window.start,
            items: items[window].to_vec(),
        }
    }
}
