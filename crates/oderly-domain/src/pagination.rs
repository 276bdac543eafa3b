//! Pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Fixed window size for every list endpoint.
pub const PAGE_SIZE: u64 = 5;

/// Offset/limit pagination with a fixed window of [`PAGE_SIZE`] rows.
///
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32) -> Self {
        Self { page }.clamped()
    }

    /// Clamp `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
        }
    }

    /// Number of rows to skip.
    pub fn offset(self) -> u64 {
        u64::from(self.clamped().page - 1) * PAGE_SIZE
    }

    /// Maximum number of rows to return.
    pub fn limit(self) -> u64 {
        PAGE_SIZE
    }
}
