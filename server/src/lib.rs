//! To-do list REST API.
//!
//! # Overview
//! A single resource, `/v1/todos`, backed by one relational table. Items are
//! keyed by lowercase ULIDs, which double as pagination cursors, and each
//! description may be held by at most one item.
//!
//! # Design
//! - [`id`] mints sortable ids behind a clock port.
//! - [`store`] defines the `TodoStore` seam plus SQLite and in-memory
//!   backends. Uniqueness is enforced by the backend, never pre-checked.
//! - [`pagination`] turns a cursor and page size into a bounded scan.
//! - [`routes`] adapts HTTP requests onto the store; [`error`] renders
//!   failures as problem documents.
//! - The store handle is opened by the binary and passed into the router
//!   through [`AppState`]; nothing is process-global.

pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod pagination;
pub mod routes;
pub mod schema;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use error::ApiError;
pub use model::{CreateTodoResponse, ListTodosResponse, TodoItem};
pub use routes::{app, router, run, AppState};
pub use store::{MemoryStore, SqliteStore, StoreError, TodoStore};
