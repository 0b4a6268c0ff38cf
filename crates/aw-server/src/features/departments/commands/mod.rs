pub mod create;
pub mod delete;
pub mod patch;
pub mod update;

pub use create::{CreateDepartmentCommand, CreateDepartmentError};
pub use delete::{DeleteDepartmentCommand, DeleteDepartmentError};
pub use patch::{PatchDepartmentCommand, PatchDepartmentError};
pub use update::{UpdateDepartmentCommand, UpdateDepartmentError};
