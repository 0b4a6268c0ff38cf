pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateStoreCommand, CreateStoreError};
pub use delete::{DeleteStoreCommand, DeleteStoreError};
pub use update::{UpdateStoreCommand, UpdateStoreError};
