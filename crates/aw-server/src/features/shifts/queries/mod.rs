pub mod get;
pub mod list;

pub use get::{GetShiftError, GetShiftQuery};
pub use list::{ListShiftsError, ListShiftsQuery};
