//! Wire and domain types for to-do items.
//!
//! # Design
//! `TodoItem` is both the stored record and the JSON shape returned to
//! clients. Request payloads keep every field optional so that a missing
//! field surfaces as a per-field validation error instead of a body
//! rejection.

use serde::{Deserialize, Serialize};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub description: String,
    pub is_completed: bool,
}

/// Body of `POST /v1/todos`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// Body of `PUT /v1/todos/{id}`. Both fields replace the stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// Query string of `GET /v1/todos`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTodosParams {
    pub is_completed: Option<bool>,
    pub page_size: Option<i64>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoResponse {
    pub item: TodoItem,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTodosResponse {
    pub items: Vec<TodoItem>,
    pub next_page_token: Option<String>,
}
