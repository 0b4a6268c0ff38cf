//! Sales persons feature
//!
//! A sales person is a current employee with a row in `sales.sales_person`.
//! Promoting an employee flips their person type to `SP`; removing the
//! sales person flips it back to `EM`.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::{sales_persons_routes, sales_territory_routes};
pub use types::{SalesPerson, SalesTerritory};
