//! Mock auth helpers for tests.
//!
//! `MockAuth` mints a real HS256 access token for a chosen identity so tests
//! can exercise bearer parsing and token validation without a login round trip.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use oderly_auth_types::token::issue_access_token;
use oderly_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn user(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::User)
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    /// Signed access token for this identity using [`TEST_JWT_SECRET`].
    pub fn token(&self) -> String {
        issue_access_token(self.user_id, self.user_role, TEST_JWT_SECRET)
            .expect("sign test token")
            .0
    }

    /// Headers carrying `Authorization: Bearer <token>`.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token()))
                .expect("valid header value"),
        );
        map
    }
}
