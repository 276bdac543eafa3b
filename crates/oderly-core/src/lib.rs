//! Service plumbing shared by Oderly HTTP services.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
