//! Cursor pagination over items ordered by id.
//!
//! # Design
//! The cursor is the id of the last item a caller has seen. A page holds the
//! first `page_size` items whose id sorts strictly after the cursor, and the
//! next cursor is the id of the page's last item. An empty page carries no
//! cursor and marks the end of the stream. A full page that happens to be
//! the last one still carries a cursor; the follow-up request returns the
//! empty page. Callers stop on an empty page, not on a missing cursor.

use crate::model::TodoItem;
use crate::store::{ListQuery, StoreError, TodoStore};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page a single call returns.
pub const MAX_PAGE_SIZE: usize = 100;

/// Resolve a requested page size. Absent means the default; anything outside
/// `1..=MAX_PAGE_SIZE` means the maximum.
pub fn clamp_page_size(requested: Option<i64>) -> usize {
    match requested {
        None => DEFAULT_PAGE_SIZE,
        Some(n) if (1..=MAX_PAGE_SIZE as i64).contains(&n) => n as usize,
        Some(_) => MAX_PAGE_SIZE,
    }
}

/// Treat a blank or whitespace-only cursor as no cursor.
pub fn normalize_cursor(cursor: Option<&str>) -> Option<String> {
    cursor
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub page_size: Option<i64>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<TodoItem>,
    pub next_cursor: Option<String>,
}

impl PageRequest {
    fn to_query(&self) -> ListQuery {
        ListQuery {
            is_completed: self.is_completed,
            after: normalize_cursor(self.cursor.as_deref()),
            limit: clamp_page_size(self.page_size),
        }
    }
}

/// Fetch one page from `store`.
pub async fn paginate(store: &dyn TodoStore, request: &PageRequest) -> Result<Page, StoreError> {
    let items = store.list(&request.to_query()).await?;
    let next_cursor = items.last().map(|item| item.id.clone());
    Ok(Page { items, next_cursor })
}
