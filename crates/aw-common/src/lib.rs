//! AdventureWorks common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Ambient pieces shared by every AdventureWorks workspace member:
//!
//! - **Logging**: `tracing` subscriber setup driven by `LOG_*` variables
//! - **Error Handling**: the cross-crate [`AwError`] type

pub mod error;
pub mod logging;

pub use error::{AwError, Result};
