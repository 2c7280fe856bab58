//! Shared types for the storefront workspace
//!
//! Error codes, the JSON response envelope and small time helpers used by
//! the server crate and its tests.

pub mod error;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
