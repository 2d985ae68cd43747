use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::document::DocumentStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseFilterError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseFilterError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Field the document list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    UploadedAt,
    Filename,
    Status,
    FileSize,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::UploadedAt,
        SortField::Filename,
        SortField::Status,
        SortField::FileSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::UploadedAt => "uploaded_at",
            SortField::Filename => "filename",
            SortField::Status => "status",
            SortField::FileSize => "file_size",
        }
    }
}

impl FromStr for SortField {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| ParseFilterError::new("sort field", s))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ParseFilterError::new("sort direction", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter; `All` disables status filtering.
///
/// There is deliberately no `Unknown` variant: documents with an unknown
/// status are only visible under `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Processed,
    Processing,
    Failed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Processed => "processed",
            StatusFilter::Processing => "processing",
            StatusFilter::Failed => "failed",
        }
    }

    pub fn matches(&self, status: DocumentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Processed => status == DocumentStatus::Processed,
            StatusFilter::Processing => status == DocumentStatus::Processing,
            StatusFilter::Failed => status == DocumentStatus::Failed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(StatusFilter::All),
            "processed" => Ok(StatusFilter::Processed),
            "processing" => Ok(StatusFilter::Processing),
            "failed" => Ok(StatusFilter::Failed),
            other => Err(ParseFilterError::new("status filter", other)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current search, sort, filter and page selection.
///
/// 当前的搜索、排序、筛选与分页状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
    pub status_filter: StatusFilter,
    /// 1-based
    pub page: usize,
}

impl FilterState {
    pub fn trimmed_term(&self) -> &str {
        self.search_term.trim()
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_by: SortField::default(),
            sort_direction: SortDirection::default(),
            status_filter: StatusFilter::default(),
            page: 1,
        }
    }
}

/// Owner of the [`FilterState`].
///
/// Setters are synchronous and never fail: malformed values are ignored and
/// out-of-range pages are clamped. Each setter returns whether the state
/// actually changed so callers can skip redundant work.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
}

impl FilterStore {
    pub fn new(initial: FilterState) -> Self {
        let mut state = initial;
        state.page = state.page.max(1);
        Self { state }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn set_search_term(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.state.search_term == value {
            return false;
        }
        self.state.search_term = value;
        self.state.page = 1;
        true
    }

    /// Update the sort field; `None` keeps the current direction.
    pub fn set_sort(&mut self, field: SortField, direction: Option<SortDirection>) -> bool {
        let direction = direction.unwrap_or(self.state.sort_direction);
        if self.state.sort_by == field && self.state.sort_direction == direction {
            return false;
        }
        self.state.sort_by = field;
        self.state.sort_direction = direction;
        self.state.page = 1;
        true
    }

    /// String-typed [`set_sort`](Self::set_sort) for untrusted payloads.
    pub fn set_sort_str(&mut self, field: &str, direction: Option<&str>) -> bool {
        let Ok(field) = field.parse::<SortField>() else {
            debug!(field, "ignoring unknown sort field");
            return false;
        };
        let direction = match direction.map(str::parse::<SortDirection>) {
            None => None,
            Some(Ok(direction)) => Some(direction),
            Some(Err(err)) => {
                debug!(error = %err, "ignoring unknown sort direction");
                return false;
            }
        };
        self.set_sort(field, direction)
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) -> bool {
        if self.state.status_filter == status {
            return false;
        }
        self.state.status_filter = status;
        self.state.page = 1;
        true
    }

    pub fn set_status_filter_str(&mut self, status: &str) -> bool {
        match status.parse::<StatusFilter>() {
            Ok(status) => self.set_status_filter(status),
            Err(err) => {
                debug!(error = %err, "ignoring unknown status filter");
                false
            }
        }
    }

    /// Set the page, clamped into `1..=max(total_pages, 1)`. Returns the page stored.
    pub fn set_page(&mut self, page: usize, total_pages: usize) -> usize {
        self.state.page = page.clamp(1, total_pages.max(1));
        self.state.page
    }

    pub fn reset_page(&mut self) {
        self.state.page = 1;
    }

    /// Clear the search term and go back to page 1; sort and filter stay.
    pub fn clear(&mut self) -> bool {
        let changed = !self.state.search_term.is_empty() || self.state.page != 1;
        self.state.search_term.clear();
        self.state.page = 1;
        changed
    }
}
