//! Auth types shared across the Oderly workspace.
//!
//! Provides JWT issue/validation and `Authorization: Bearer` header parsing.

pub mod bearer;
pub mod token;
