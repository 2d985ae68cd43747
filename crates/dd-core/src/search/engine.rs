use std::cmp::Ordering;

use serde::Serialize;

use super::filter::{FilterState, SortDirection, SortField};
use crate::document::Document;

/// Documents per page in the document grid.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// One page of the filtered and sorted document list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisiblePage {
    pub items: Vec<Document>,
    /// 1-based page that was requested
    pub page: usize,
    pub total_pages: usize,
    /// Number of documents matching the filters, across all pages
    pub total_count: usize,
}

impl VisiblePage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 0,
            total_count: 0,
        }
    }

    /// "No results" state; distinct from an error.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

/// Pure search/sort/paginate over an in-memory collection.
///
/// Never fails: missing or malformed fields fall back to safe defaults
/// (empty string, 0 bytes, oldest possible timestamp).
#[derive(Debug, Clone, Copy)]
pub struct LocalSearchEngine {
    page_size: usize,
}

impl Default for LocalSearchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl LocalSearchEngine {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Filter by term and status, then stable-sort. Pagination is not applied.
    pub fn filter_and_sort<'a>(
        &self,
        documents: &'a [Document],
        filters: &FilterState,
    ) -> Vec<&'a Document> {
        let needle = filters.trimmed_term().to_lowercase();

        let mut matched: Vec<&Document> = documents
            .iter()
            .filter(|doc| matches_term(doc, &needle))
            .filter(|doc| filters.status_filter.matches(doc.status))
            .collect();

        // `sort_by` is stable; reversing the comparator keeps ties in input order.
        matched.sort_by(|a, b| {
            let ordering = compare_by(a, b, filters.sort_by);
            match filters.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        matched
    }

    pub fn compute(&self, documents: &[Document], filters: &FilterState) -> VisiblePage {
        let matched = self.filter_and_sort(documents, filters);
        let total_count = matched.len();
        let page = filters.page.max(1);
        let start = (page - 1).saturating_mul(self.page_size);

        let items = matched
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        VisiblePage {
            items,
            page,
            total_pages: self.total_pages(total_count),
            total_count,
        }
    }
}

fn matches_term(doc: &Document, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    doc.searchable_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare_by(a: &Document, b: &Document, field: SortField) -> Ordering {
    match field {
        SortField::Filename => a.filename.cmp(&b.filename),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::UploadedAt => timestamp_key(a).cmp(&timestamp_key(b)),
        SortField::FileSize => a.file_size.unwrap_or(0).cmp(&b.file_size.unwrap_or(0)),
    }
}

fn timestamp_key(doc: &Document) -> i64 {
    doc.uploaded_at_millis().unwrap_or(i64::MIN)
}
