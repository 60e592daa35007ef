//! Cursor-based pagination
//!
//! List endpoints return a page of results plus an opaque `next_cursor`.
//! [`paginate`] keeps requesting pages until it has `limit` items or the
//! service stops handing out cursors. Cursors are passed through untouched.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pick one
pub const DEFAULT_PER_PAGE: usize = 200;

/// One page of a list endpoint, also used for the combined result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,

    /// Present while more items exist
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { results, next_cursor }
    }
}

/// How many items to fetch and where to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginateOptions {
    /// Maximum number of items returned
    pub limit: usize,

    /// Upper bound on a single request's page size
    pub per_page: usize,

    /// Cursor from an earlier listing to continue from
    pub start_cursor: Option<String>,
}

impl PaginateOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            per_page: DEFAULT_PER_PAGE,
            start_cursor: None,
        }
    }

    /// Fetch everything the service has
    pub fn all() -> Self {
        Self::new(Limits::ALL)
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn start_cursor(mut self, cursor: Option<String>) -> Self {
        self.start_cursor = cursor;
        self
    }
}

/// Default result counts for list commands
pub struct Limits;

impl Limits {
    pub const TASKS: usize = 300;
    pub const PROJECTS: usize = 50;
    pub const SECTIONS: usize = 300;
    pub const LABELS: usize = 300;
    pub const COMMENTS: usize = 10;

    /// No limit
    pub const ALL: usize = usize::MAX;
}

/// Fetches pages through `fetch_page(cursor, page_size)` until `limit`
/// items are collected or no cursor is returned.
///
/// Requests are issued one at a time. The page size never exceeds the
/// remaining quota and is never zero. The returned cursor is the last one
/// seen, so a caller can tell the user that more items exist. An error from
/// `fetch_page` is returned as-is and discards what was collected.
pub fn paginate<T, E, F>(mut fetch_page: F, options: &PaginateOptions) -> Result<Page<T>, E>
where
    F: FnMut(Option<&str>, usize) -> Result<Page<T>, E>,
{
    let per_page = options.per_page.max(1);
    let mut cursor = options.start_cursor.clone();
    let mut collected: Vec<T> = Vec::new();

    while collected.len() < options.limit {
        let remaining = options.limit - collected.len();
        let page_size = remaining.min(per_page);

        tracing::debug!(cursor = ?cursor, page_size, collected = collected.len(), "fetching page");
        let page = fetch_page(cursor.as_deref(), page_size)?;

        collected.extend(page.results);
        cursor = page.next_cursor;

        if cursor.is_none() {
            break;
        }
    }

    collected.truncate(options.limit);
    Ok(Page::new(collected, cursor))
}
