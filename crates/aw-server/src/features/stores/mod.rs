//! Stores feature
//!
//! A store is its own business entity, optionally served by a sales person.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::stores_routes;
pub use types::Store;
