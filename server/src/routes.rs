//! HTTP handlers for the `/v1/todos` resource.
//!
//! Handlers validate input, call the store, and map the outcome to a status
//! code. They hold no state of their own; the store and id generator arrive
//! through [`AppState`].

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::id::{IdGenerator, SystemClock, UlidGenerator};
use crate::model::{
    CreateTodoRequest, CreateTodoResponse, ListTodosParams, ListTodosResponse, TodoItem,
    UpdateTodoRequest,
};
use crate::pagination::{paginate, PageRequest};
use crate::store::{MemoryStore, TodoStore};
use crate::validation::validate_todo;

pub const TODOS_PATH: &str = "/v1/todos";

/// Dependencies shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub ids: Arc<dyn IdGenerator>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Empty in-memory store with ULID ids from the system clock.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(UlidGenerator::new(SystemClock)),
        )
    }
}

/// Path of a single item, as used in the `Location` header.
pub fn item_path(id: &str) -> String {
    format!("{TODOS_PATH}/{id}")
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(TODOS_PATH, get(list_todos).post(create_todo))
        .route("/v1/todos/", get(list_todos).post(create_todo))
        .route(
            "/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Router over a fresh in-memory store.
pub fn app() -> Router {
    router(AppState::in_memory())
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

async fn health() -> &'static str {
    "ok"
}

async fn fallback() -> ApiError {
    ApiError::NotFound
}

#[instrument(skip(state))]
async fn list_todos(
    State(state): State<AppState>,
    params: Result<Query<ListTodosParams>, QueryRejection>,
) -> Result<Json<ListTodosResponse>, ApiError> {
    let Query(params) = params?;
    let request = PageRequest {
        cursor: params.next_page_token,
        page_size: params.page_size,
        is_completed: params.is_completed,
    };
    let page = paginate(state.store.as_ref(), &request).await?;
    Ok(Json(ListTodosResponse {
        items: page.items,
        next_page_token: page.next_cursor,
    }))
}

#[instrument(skip(state))]
async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[instrument(skip(state))]
async fn create_todo(
    State(state): State<AppState>,
    request: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let valid = validate_todo(request.description.as_deref(), request.is_completed)
        .map_err(ApiError::Validation)?;

    let item = TodoItem {
        id: state.ids.new_id(),
        description: valid.description,
        is_completed: valid.is_completed,
    };
    state.store.insert(&item).await?;
    info!(id = %item.id, "created item");

    let location = item_path(&item.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreateTodoResponse { item }),
    ))
}

#[instrument(skip(state))]
async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = request?;
    let valid = validate_todo(request.description.as_deref(), request.is_completed)
        .map_err(ApiError::Validation)?;

    let rows = state
        .store
        .update(&id, &valid.description, valid.is_completed)
        .await?;
    if rows == 0 {
        return Err(ApiError::NotFound);
    }
    info!(%id, "updated item");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rows = state.store.delete(&id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound);
    }
    info!(%id, "deleted item");
    Ok(StatusCode::OK)
}
