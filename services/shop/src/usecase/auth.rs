use anyhow::anyhow;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use oderly_auth_types::token::{issue_access_token, validate_access_token};
use oderly_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{
    AuthContext, User, validate_email, validate_password, validate_username,
};
use crate::error::ShopServiceError;

/// Hash a password into an argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, ShopServiceError> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Run CPU-bound password work on the blocking pool.
async fn off_executor<T, F>(work: F) -> Result<T, ShopServiceError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| anyhow!("password task: {e}").into())
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

pub struct SignupUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> SignupUseCase<R> {
    pub async fn execute(&self, input: SignupInput) -> Result<User, ShopServiceError> {
        if !validate_email(&input.email) {
            return Err(ShopServiceError::validation("invalid email"));
        }
        if !validate_username(&input.username) {
            return Err(ShopServiceError::validation(
                "username must be at least 4 characters",
            ));
        }
        if !validate_password(&input.password) {
            return Err(ShopServiceError::validation(
                "password must be at least 6 characters",
            ));
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ShopServiceError::UserAlreadyExists);
        }

        let password = input.password;
        let password_hash = off_executor(move || hash_password(&password)).await??;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: input.username.trim().to_owned(),
            email: input.email,
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            password_hash,
            role: UserRole::User,
            shipping_address_id: None,
            billing_address_id: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub access_token_exp: u64,
}

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ShopServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ShopServiceError::UserNotFound)?;
        let password = input.password;
        let hash = user.password_hash.clone();
        if !off_executor(move || verify_password(&password, &hash)).await? {
            return Err(ShopServiceError::IncorrectPassword);
        }
        let (access_token, access_token_exp) =
            issue_access_token(user.id, user.role, &self.jwt_secret)
                .map_err(|e| anyhow!("issue access token: {e}"))?;
        Ok(LoginOutput {
            user,
            access_token,
            access_token_exp,
        })
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolve a bearer token to the caller.
///
/// No token is [`AuthContext::Anonymous`]. A token that fails validation, or
/// whose subject no longer exists, is [`ShopServiceError::Unauthorized`].
/// The role comes from the store, not from the token.
pub struct AuthenticateUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> AuthenticateUseCase<R> {
    pub async fn execute(&self, token: Option<&str>) -> Result<AuthContext, ShopServiceError> {
        let Some(token) = token else {
            return Ok(AuthContext::Anonymous);
        };
        let info = validate_access_token(token, &self.jwt_secret)
            .map_err(|_| ShopServiceError::Unauthorized)?;
        let user = self
            .users
            .find_by_id(info.user_id)
            .await?
            .ok_or(ShopServiceError::Unauthorized)?;
        Ok(AuthContext::AuthenticatedAs(user))
    }
}
