use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use oderly_core::error::error_response;

/// Shop service error variants.
///
/// Every variant carries a stable numeric `code`; `kind` is the coarse
/// category rendered next to it.
#[derive(Debug, thiserror::Error)]
pub enum ShopServiceError {
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("{0}")]
    ValidationFailed(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
    #[error("unauthorized")]
    Unauthorized,
    #[error("product not found")]
    ProductNotFound,
    #[error("address not found")]
    AddressNotFound,
    #[error("address does not belong to this user")]
    AddressNotOwned,
    #[error("order not found")]
    OrderNotFound,
    #[error("cart item not found")]
    CartItemNotFound,
    #[error("invalid order status transition")]
    InvalidStatusTransition,
}

impl ShopServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self.status() {
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::INTERNAL_SERVER_ERROR => "INTERNAL",
            _ => "BAD_REQUEST",
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::UserAlreadyExists => 1001,
            Self::UserNotFound => 1002,
            Self::IncorrectPassword => 1003,
            Self::ValidationFailed(_) => 1004,
            Self::Internal(_) => 1005,
            Self::Unauthorized => 1006,
            Self::ProductNotFound => 1007,
            Self::AddressNotFound => 1008,
            Self::AddressNotOwned => 1009,
            Self::OrderNotFound => 1010,
            Self::CartItemNotFound => 1011,
            Self::InvalidStatusTransition => 1012,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::ProductNotFound
            | Self::AddressNotFound
            | Self::OrderNotFound
            | Self::CartItemNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists
            | Self::IncorrectPassword
            | Self::ValidationFailed(_)
            | Self::AddressNotOwned
            | Self::InvalidStatusTransition => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ShopServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationFailed(rejection.body_text())
    }
}

impl From<PathRejection> for ShopServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::ValidationFailed(rejection.body_text())
    }
}

impl IntoResponse for ShopServiceError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.code(), self.to_string())
    }
}
