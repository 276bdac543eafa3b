use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body shared by every error response.
///
/// `kind` is the coarse category (`BAD_REQUEST`, `NOT_FOUND`, `UNAUTHORIZED`,
/// `INTERNAL`), `code` a stable number distinct per failure reason.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub code: u16,
    pub message: String,
}

/// Build an error response from its parts.
///
/// Callers are responsible for logging; 4xx are expected client errors and
/// `tower-http`'s trace layer already records status for every request.
pub fn error_response(status: StatusCode, kind: &str, code: u16, message: String) -> Response {
    (status, axum::Json(ErrorBody { kind, code, message })).into_response()
}
