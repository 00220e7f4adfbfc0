//! Walking a listing page by page.
//!
//! The server echoes the last item's id as `nextPageToken` even when that
//! page was the final one, so a missing token is not a reliable end marker.
//! The walk ends on the first page that comes back empty.

use crate::client::TodoClient;
use crate::http::HttpRequest;
use crate::types::{ListTodosQuery, ListTodosResponse};

/// Chains `nextPageToken` across list calls until an empty page arrives.
///
/// ```
/// use todo_core::{ListTodosQuery, PageWalker, TodoClient};
///
/// let client = TodoClient::new("http://localhost:3000");
/// let mut walker = PageWalker::new(ListTodosQuery::default());
/// let first = walker.next_request(&client).unwrap();
/// assert_eq!(first.path, "http://localhost:3000/v1/todos");
/// ```
#[derive(Debug, Clone)]
pub struct PageWalker {
    query: ListTodosQuery,
    finished: bool,
}

impl PageWalker {
    pub fn new(query: ListTodosQuery) -> Self {
        Self {
            query,
            finished: false,
        }
    }

    /// Request for the next page, or `None` once the walk is over.
    pub fn next_request(&self, client: &TodoClient) -> Option<HttpRequest> {
        if self.finished {
            return None;
        }
        Some(client.build_list_todos(&self.query))
    }

    /// Record a fetched page and move the cursor past it.
    pub fn advance(&mut self, page: &ListTodosResponse) {
        match (page.items.is_empty(), page.next_page_token.as_ref()) {
            (false, Some(token)) => self.query.next_page_token = Some(token.clone()),
            _ => self.finished = true,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
