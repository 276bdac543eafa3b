//! `Authorization: Bearer` header parsing.

use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::HeaderMap;

use crate::token::AuthError;

/// Read the bearer token from the `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent and [`AuthError::Malformed`]
/// when it is present but not a well-formed `Bearer <token>` value.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    let header = headers
        .typed_try_get::<Authorization<Bearer>>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(header.map(|Authorization(bearer)| bearer.token().to_owned()))
}
