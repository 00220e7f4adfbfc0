//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because callers act on
//! them: a missing item is shown as such, and a rejected form is re-rendered
//! with its per-field messages. All other non-2xx responses land in
//! `HttpError` with the raw status code and body for debugging.

use crate::types::ProblemDetails;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404; the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 400 with a problem document.
    #[error("validation failed: {}", summarize(.0))]
    Validation(ProblemDetails),

    /// The server returned a non-2xx status not covered above.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

fn summarize(problem: &ProblemDetails) -> String {
    problem
        .detail
        .iter()
        .cloned()
        .chain(
            problem
                .errors
                .iter()
                .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}"))),
        )
        .collect::<Vec<_>>()
        .join("; ")
}
