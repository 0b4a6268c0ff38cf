//! Request classification for the mediator pipeline
//!
//! Commands mutate state (POST/PUT/PATCH/DELETE), queries only read (GET).
//! Each request type opts into exactly one of the two markers.

/// Marker for write requests
pub trait Command {}

/// Marker for read-only requests
pub trait Query {}
