//! Fixed-size pagination with clamped page indices.

/// Rows per page, shared by every dataset.
pub const PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Paginator {
    /// A zero page size is treated as one row per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Always at least one page, even for an empty collection.
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size).max(1)
    }

    /// Pulls `index` down onto the last page if it points past the end.
    pub fn clamp(&self, index: usize, count: usize) -> usize {
        index.min(self.total_pages(count) - 1)
    }

    pub fn next(&self, index: usize, count: usize) -> usize {
        (index + 1).min(self.total_pages(count) - 1)
    }

    pub fn prev(&self, index: usize) -> usize {
        index.saturating_sub(1)
    }

    /// Half-open window `[index*size, (index+1)*size)` intersected with the
    /// collection; empty when the index is out of range.
    pub fn page<'s, T>(&self, items: &'s [T], index: usize) -> &'s [T] {
        let start = index.saturating_mul(self.page_size);
        if start >= items.len() {
            return &items[..0];
        }
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn window(&self, index: usize, count: usize) -> PageWindow {
        if count == 0 {
            return PageWindow {
                start: 0,
                end: 0,
                total: 0,
            };
        }
        let start = (index * self.page_size + 1).min(count);
        let end = ((index + 1) * self.page_size).min(count);
        PageWindow {
            start,
            end,
            total: count,
        }
    }
}

/// 1-based item range of the current page, for "51–100 of 120" labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl std::fmt::Display for PageWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.total == 0 {
            write!(f, "0 of 0")
        } else {
            write!(f, "{}–{} of {}", self.start, self.end, self.total)
        }
    }
}
