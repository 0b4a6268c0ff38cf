//! Postal addresses and their reference data
//!
//! Addresses are shared rows; employees and stores link to them through
//! `person.business_entity_address`. An address that is still linked cannot be
//! deleted.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::{address_reference_routes, addresses_routes};
pub use types::{Address, AddressInput, AddressType, StateProvince};
