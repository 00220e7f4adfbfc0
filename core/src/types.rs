//! Domain DTOs for the v1 todo API.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! so the client carries no dependency on the server's web framework.
//! Integration tests catch any schema drift between the two crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub description: String,
    pub is_completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub description: String,
    pub is_completed: bool,
}

/// Response payload for a created todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoResponse {
    pub item: TodoItem,
}

/// Request payload for replacing a todo. Both fields always travel together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub description: String,
    pub is_completed: bool,
}

/// Query parameters for listing todos. `None` fields are left off the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTodosQuery {
    pub is_completed: Option<bool>,
    pub page_size: Option<u32>,
    pub next_page_token: Option<String>,
}

/// One page of todos. An empty `items` marks the end of the listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListTodosResponse {
    pub items: Vec<TodoItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// RFC 7807 problem document returned with 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ProblemDetails {
    /// Messages reported for one field, empty if none.
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}
