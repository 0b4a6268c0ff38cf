//! Shared utilities and types for feature modules
//!
//! - **pagination**: Common pagination types and helpers
//! - **validation**: Field validation used by every command
//! - **error_helpers**: Database constraint classification

pub mod error_helpers;
pub mod pagination;
pub mod validation;

pub use pagination::{Paginated, PaginationMetadata, PaginationParams};
pub use validation::FieldError;
