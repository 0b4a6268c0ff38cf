pub mod get;
pub mod list;

pub use get::{GetStoreError, GetStoreQuery};
pub use list::{ListStoresError, ListStoresQuery};
