//! Request extractors: JSON bodies and the caller's identity.

use std::future::Future;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use oderly_auth_types::bearer::bearer_token;

use crate::domain::types::{AuthContext, User};
use crate::error::ShopServiceError;
use crate::state::AppState;
use crate::usecase::auth::AuthenticateUseCase;

/// JSON body whose rejections surface as [`ShopServiceError::ValidationFailed`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ShopServiceError))]
pub struct Payload<T>(pub T);

/// Path parameters whose rejections surface as [`ShopServiceError::ValidationFailed`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ShopServiceError))]
pub struct PathParam<T>(pub T);

/// Parse the raw query string with `serde_qs`; absent means `T::default()`.
pub fn parse_query<T>(raw_query: Option<&str>) -> Result<T, ShopServiceError>
where
    T: DeserializeOwned + Default,
{
    raw_query
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| ShopServiceError::validation(format!("invalid query: {e}")))
        .map(Option::unwrap_or_default)
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ShopServiceError;

    // Extract synchronously and return a 'static future; see the note on
    // precise capturing in axum-core 0.5's `fn -> impl Future` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers).map_err(|_| ShopServiceError::Unauthorized);
        let usecase = AuthenticateUseCase {
            users: state.user_repo(),
            jwt_secret: state.jwt_secret.clone(),
        };
        async move {
            let token = token?;
            usecase.execute(token.as_deref()).await
        }
    }
}

/// Any authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ShopServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let ctx = AuthContext::from_request_parts(parts, state);
        async move {
            match ctx.await? {
                AuthContext::AuthenticatedAs(user) => Ok(Self(user)),
                AuthContext::Anonymous => Err(ShopServiceError::Unauthorized),
            }
        }
    }
}

/// An authenticated user whose stored role is `ADMIN`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ShopServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let current = CurrentUser::from_request_parts(parts, state);
        async move {
            let CurrentUser(user) = current.await?;
            if user.role.is_admin() {
                Ok(Self(user))
            } else {
                Err(ShopServiceError::Unauthorized)
            }
        }
    }
}
