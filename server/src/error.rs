//! HTTP-facing errors.
//!
//! # Design
//! Every failure a handler can produce is an `ApiError`, rendered as an
//! RFC 7807 problem document. A duplicate description refused by the store
//! is folded into the same 400 shape as a field validation failure, so a
//! client cannot tell whether the check happened before or during the
//! write. Bodies and query strings the extractors cannot decode are a 400
//! with a `detail` line. Storage failures are logged and answered with a
//! bare 500.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::validation::{duplicate_description, FieldErrors};

pub const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed validation")]
    Validation(FieldErrors),

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation => ApiError::Validation(duplicate_description()),
            other => ApiError::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Problem document body.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ProblemDetails {
    pub fn for_status(status: StatusCode) -> Self {
        let (kind, title) = match status {
            StatusCode::BAD_REQUEST => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.1",
                "Bad Request",
            ),
            StatusCode::NOT_FOUND => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.5",
                "Not Found",
            ),
            _ => (
                "https://tools.ietf.org/html/rfc9110#section-15.6.1",
                "An error occurred while processing your request.",
            ),
        };
        Self {
            kind,
            title,
            status: status.as_u16(),
            detail: None,
            errors: None,
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            title: "One or more validation errors occurred.",
            errors: Some(errors),
            ..Self::for_status(StatusCode::BAD_REQUEST)
        }
    }

    pub fn bad_request(detail: String) -> Self {
        Self {
            detail: Some(detail),
            ..Self::for_status(StatusCode::BAD_REQUEST)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, problem) = match self {
            ApiError::Validation(errors) => {
                warn!(fields = ?errors.keys().collect::<Vec<_>>(), "rejected request");
                (StatusCode::BAD_REQUEST, ProblemDetails::validation(errors))
            }
            ApiError::BadRequest(detail) => {
                warn!(%detail, "unreadable request");
                (StatusCode::BAD_REQUEST, ProblemDetails::bad_request(detail))
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ProblemDetails::for_status(StatusCode::NOT_FOUND),
            ),
            ApiError::Store(err) => {
                error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::for_status(StatusCode::INTERNAL_SERVER_ERROR),
                )
            }
        };

        let mut response = (status, Json(problem)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}
