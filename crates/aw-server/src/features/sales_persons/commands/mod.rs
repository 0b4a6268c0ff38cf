pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateSalesPersonCommand, CreateSalesPersonError};
pub use delete::{DeleteSalesPersonCommand, DeleteSalesPersonError};
pub use update::{UpdateSalesPersonCommand, UpdateSalesPersonError};
