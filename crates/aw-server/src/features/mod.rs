//! Feature modules implementing the AdventureWorks HR/Sales API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes. Handlers are registered with the mediator in [`crate::cqrs`].
//!
//! # Features
//!
//! - **addresses**: Postal addresses plus the address-type and state-province lookups
//! - **departments**: Department CRUD
//! - **employees**: Employee records, pay and department history, hire/terminate/rehire
//! - **sales_persons**: Sales compensation for current employees, sales territories
//! - **shifts**: Work shift CRUD
//! - **stores**: Retail stores served by sales persons
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared row types and validation

pub mod addresses;
pub mod departments;
pub mod employees;
pub mod sales_persons;
pub mod shared;
pub mod shifts;
pub mod stores;

use axum::Router;

use crate::cqrs::AppMediator;

/// Creates the versioned API router with all feature routes mounted
///
/// - `/departments`, `/shifts`, `/addresses`, `/employees`, `/sales-persons`, `/stores`
/// - `/address-types`, `/state-provinces`, `/sales-territories` lookups
pub fn router() -> Router<AppMediator> {
    Router::new()
        .nest("/departments", departments::departments_routes())
        .nest("/shifts", shifts::shifts_routes())
        .nest("/addresses", addresses::addresses_routes())
        .nest("/employees", employees::employees_routes())
        .nest("/sales-persons", sales_persons::sales_persons_routes())
        .nest("/stores", stores::stores_routes())
        .merge(addresses::address_reference_routes())
        .merge(sales_persons::sales_territory_routes())
}
