//! AdventureWorks HR/Sales Server Library
//!
//! REST API over the AdventureWorks `person`, `humanresources` and `sales`
//! schemas: employees and their lifecycle, departments, shifts, addresses,
//! sales persons and stores.
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** architecture:
//!
//! - **Commands** (Write Operations): create, update, patch, delete and the
//!   hire/terminate/rehire transitions. Executed via POST, PUT, PATCH, DELETE.
//! - **Queries** (Read Operations): lists and lookups. Executed via GET.
//!
//! Routes send requests through the mediator built in [`cqrs::build_mediator`];
//! each handler owns its validation and its `thiserror` error enum, which
//! converts into [`AppError`] for the HTTP response.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework, with JWT bearer auth on `/api/v1`
//! - **SQLx**: PostgreSQL access and migrations
//! - **Tower**: middleware (CORS, tracing, compression)
//! - **utoipa**: OpenAPI document
//!
//! # Example
//!
//! ```no_run
//! use aw_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{AppError, ServerError, ServerResult};
