//! Per-dataset view state and the filter → sort → paginate pipeline.
//!
//! Derived collections are never stored. `DatasetView::derive` recomputes the
//! three stages in order from the snapshot and the current state, and every
//! state change re-clamps the page index against a freshly derived count.

use crate::domain::filter::filter_rows;
use crate::domain::pagination::{PageWindow, Paginator};
use crate::domain::row::Row;
use crate::domain::sort::{SortDirection, SortKey, sort_rows};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<K> {
    pub search_query: String,
    pub sort_key: Option<K>,
    pub sort_direction: SortDirection,
    pub page_index: usize,
}

impl<K> Default for ViewState<K> {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            sort_key: None,
            sort_direction: SortDirection::Descending,
            page_index: 0,
        }
    }
}

impl<K: Copy> ViewState<K> {
    /// Initial state with a preselected sort.
    pub fn sorted_by(key: K, direction: SortDirection) -> Self {
        Self {
            sort_key: Some(key),
            sort_direction: direction,
            ..Self::default()
        }
    }

    pub fn sort(&self) -> Option<(K, SortDirection)> {
        self.sort_key.map(|k| (k, self.sort_direction))
    }
}

/// Output of one pipeline pass. Each stage is exposed as its own value.
#[derive(Debug)]
pub struct DerivedView<'a, R> {
    pub filtered: Vec<&'a R>,
    pub sorted: Vec<&'a R>,
    pub page_index: usize,
    pub total_pages: usize,
    pub window: PageWindow,
    paginator: Paginator,
}

impl<'a, R> DerivedView<'a, R> {
    /// Rows visible on the current page.
    pub fn page(&self) -> &[&'a R] {
        self.paginator.page(&self.sorted, self.page_index)
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// One dataset's snapshot plus its independent view state.
#[derive(Debug, Clone)]
pub struct DatasetView<R, K> {
    rows: Arc<[R]>,
    state: ViewState<K>,
    paginator: Paginator,
}

impl<R, K> DatasetView<R, K>
where
    R: Row,
    K: SortKey<R>,
{
    pub fn new(state: ViewState<K>) -> Self {
        Self::with_paginator(state, Paginator::default())
    }

    pub fn with_paginator(state: ViewState<K>, paginator: Paginator) -> Self {
        Self {
            rows: Arc::from(Vec::new()),
            state,
            paginator,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn snapshot(&self) -> Arc<[R]> {
        Arc::clone(&self.rows)
    }

    pub fn state(&self) -> &ViewState<K> {
        &self.state
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    /// Runs filter, then sort, then pagination against the current state.
    pub fn derive(&self) -> DerivedView<'_, R> {
        let filtered = filter_rows(&self.rows, &self.state.search_query);
        let sorted = sort_rows(filtered.clone(), self.state.sort());
        let total_pages = self.paginator.total_pages(sorted.len());
        let page_index = self.paginator.clamp(self.state.page_index, sorted.len());
        let window = self.paginator.window(page_index, sorted.len());
        DerivedView {
            filtered,
            sorted,
            page_index,
            total_pages,
            window,
            paginator: self.paginator,
        }
    }

    /// Filtered and sorted rows, unpaginated. This is what exports see.
    pub fn ordered(&self) -> Vec<&R> {
        sort_rows(
            filter_rows(&self.rows, &self.state.search_query),
            self.state.sort(),
        )
    }

    /// Replaces the snapshot wholesale; the view state is kept.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.rows = Arc::from(rows);
        self.reclamp();
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.search_query = query.to_string();
        self.reclamp();
    }

    /// Header-click semantics: the active key flips direction, a new key
    /// starts in its initial direction.
    pub fn toggle_sort(&mut self, key: K) {
        if self.state.sort_key == Some(key) {
            self.state.sort_direction = self.state.sort_direction.flipped();
        } else {
            self.state.sort_key = Some(key);
            self.state.sort_direction = key.initial_direction();
        }
        self.reclamp();
    }

    pub fn set_sort(&mut self, key: K, direction: SortDirection) {
        self.state.sort_key = Some(key);
        self.state.sort_direction = direction;
        self.reclamp();
    }

    pub fn clear_sort(&mut self) {
        self.state.sort_key = None;
        self.reclamp();
    }

    pub fn next_page(&mut self) {
        let count = self.visible_count();
        self.state.page_index = self.paginator.next(self.state.page_index, count);
    }

    pub fn prev_page(&mut self) {
        self.state.page_index = self.paginator.prev(self.state.page_index);
    }

    /// Jumps to a zero-based page, clamped into range.
    pub fn go_to_page(&mut self, index: usize) {
        self.state.page_index = index;
        self.reclamp();
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.visible_count())
    }

    fn visible_count(&self) -> usize {
        self.derive().sorted.len()
    }

    fn reclamp(&mut self) {
        let count = self.visible_count();
        self.state.page_index = self.paginator.clamp(self.state.page_index, count);
    }
}
