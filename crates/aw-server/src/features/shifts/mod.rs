//! Work shifts
//!
//! A shift's name and its `(start_time, end_time)` pair are both unique.
//! Overnight shifts (end before start) are allowed.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::shifts_routes;
pub use types::Shift;
