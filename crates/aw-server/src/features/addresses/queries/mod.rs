pub mod get;
pub mod list;
pub mod list_address_types;
pub mod list_state_provinces;

pub use get::{GetAddressError, GetAddressQuery};
pub use list::{ListAddressesError, ListAddressesQuery};
pub use list_address_types::{ListAddressTypesError, ListAddressTypesQuery};
pub use list_state_provinces::{ListStateProvincesError, ListStateProvincesQuery};
