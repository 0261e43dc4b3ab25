//! View derivation: search, filter, sort and paginate.
//!
//! Everything here is a pure function of the collection and the view
//! parameters. Nothing is cached and the collection is never reordered.

use std::collections::HashMap;
use std::fmt;

use crate::types::{Record, SortOrder};

/// The active sort: exactly one key and one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortState<K> {
    /// Attribute records are ordered by.
    pub key: K,
    /// Direction.
    pub order: SortOrder,
}

impl<K: Copy + Eq> SortState<K> {
    /// Creates a sort state.
    pub fn new(key: K, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Selecting the active key toggles direction; a new key starts ascending.
    pub fn select(&mut self, key: K) {
        if self.key == key {
            self.order = self.order.toggled();
        } else {
            self.key = key;
            self.order = SortOrder::Ascending;
        }
    }
}

/// One page of the filtered, sorted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleSlice<R> {
    /// Records on the current page, in display order.
    pub records: Vec<R>,
    /// Current page, always within `1..=total_pages`.
    pub current_page: usize,
    /// Number of pages, at least one.
    pub total_pages: usize,
    /// Number of records passing search and filters, across all pages.
    pub total_matches: usize,
}

/// Search, filter, sort and paging parameters.
pub(crate) struct ViewState<R: Record> {
    pub(crate) search_term: String,
    pub(crate) filters: HashMap<R::FilterKey, String>,
    pub(crate) sort: SortState<R::SortKey>,
    pub(crate) page_size: usize,
    pub(crate) current_page: usize,
}

impl<R: Record> fmt::Debug for ViewState<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("search_term", &self.search_term)
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("page_size", &self.page_size)
            .field("current_page", &self.current_page)
            .finish()
    }
}

impl<R: Record> ViewState<R> {
    pub(crate) fn new(page_size: usize, order: SortOrder) -> Self {
        Self {
            search_term: String::new(),
            filters: HashMap::new(),
            sort: SortState::new(R::default_sort_key(), order),
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Records passing search and filters, sorted, unpaginated.
    pub(crate) fn matching<'a>(&self, records: &'a [R]) -> Vec<&'a R> {
        let mut rows = filter_records(records, &self.search_term, &self.filters);
        sort_records(&mut rows, self.sort);
        rows
    }

    /// Number of records passing search and filters.
    pub(crate) fn match_count(&self, records: &[R]) -> usize {
        filter_records(records, &self.search_term, &self.filters).len()
    }

    /// Pulls `current_page` back into range for the current matches.
    pub(crate) fn clamp_page(&mut self, records: &[R]) {
        let pages = total_pages(self.match_count(records), self.page_size);
        self.current_page = clamp_page(self.current_page, pages);
    }

    /// Derives the visible slice.
    pub(crate) fn derive(&self, records: &[R]) -> VisibleSlice<R> {
        let rows = self.matching(records);
        let total_matches = rows.len();
        let total_pages = total_pages(total_matches, self.page_size);
        let current_page = clamp_page(self.current_page, total_pages);

        let start = (current_page - 1) * self.page_size;
        let records = rows
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        VisibleSlice {
            records,
            current_page,
            total_pages,
            total_matches,
        }
    }
}

/// Applies the search term, then every filter (ANDed), keeping collection order.
///
/// An empty term passes everything. A filter matches only when the record
/// has a value for the key and it equals the accepted value exactly.
pub fn filter_records<'a, R: Record>(
    records: &'a [R],
    search_term: &str,
    filters: &HashMap<R::FilterKey, String>,
) -> Vec<&'a R> {
    let needle = search_term.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches_search(&needle))
        .filter(|record| {
            filters
                .iter()
                .all(|(key, accepted)| record.filter_value(*key).as_deref() == Some(accepted))
        })
        .collect()
}

/// Stable sort by `sort.key`. Descending is the exact reverse of ascending.
pub fn sort_records<R: Record>(rows: &mut [&R], sort: SortState<R::SortKey>) {
    rows.sort_by(|a, b| a.compare(b, sort.key));
    if !sort.order.is_ascending() {
        rows.reverse();
    }
}

/// Pages needed for `matches` records, never less than one.
pub fn total_pages(matches: usize, page_size: usize) -> usize {
    matches.div_ceil(page_size.max(1)).max(1)
}

/// Clamps `page` into `1..=total_pages`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
