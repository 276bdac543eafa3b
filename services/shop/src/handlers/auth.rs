use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::ShopServiceError;
use crate::handlers::extract::{CurrentUser, Payload};
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase, SignupInput, SignupUseCase};

// ── POST /auth/signup ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Payload(body): Payload<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ShopServiceError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(SignupInput {
            username: body.username,
            email: body.email,
            phone: body.phone,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
    /// Seconds since the Unix epoch.
    pub expires_at: u64,
}

pub async fn login(
    State(state): State<AppState>,
    Payload(body): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>, ShopServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        user: output.user.into(),
        token: output.access_token,
        expires_at: output.access_token_exp,
    }))
}

// ── GET /auth/profile ────────────────────────────────────────────────────────

pub async fn profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
