pub mod create;
pub mod delete;
pub mod patch;
pub mod update;

pub use create::{CreateAddressCommand, CreateAddressError};
pub use delete::{DeleteAddressCommand, DeleteAddressError};
pub use patch::{PatchAddressCommand, PatchAddressError};
pub use update::{UpdateAddressCommand, UpdateAddressError};
