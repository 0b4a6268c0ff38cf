pub mod get;
pub mod list;
pub mod list_territories;

pub use get::{GetSalesPersonError, GetSalesPersonQuery};
pub use list::{ListSalesPersonsError, ListSalesPersonsQuery};
pub use list_territories::{ListTerritoriesError, ListTerritoriesQuery};
