//! Departments feature
//!
//! CRUD over `humanresources.department`. Names are unique across the table;
//! a department referenced by employee history cannot be deleted.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::departments_routes;
pub use types::Department;
