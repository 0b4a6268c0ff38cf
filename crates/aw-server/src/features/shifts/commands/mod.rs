pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateShiftCommand, CreateShiftError};
pub use delete::{DeleteShiftCommand, DeleteShiftError};
pub use update::{UpdateShiftCommand, UpdateShiftError};
