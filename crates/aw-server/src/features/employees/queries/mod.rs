pub mod addresses;
pub mod department_history;
pub mod get;
pub mod list;
pub mod pay_history;

pub use addresses::{ListEmployeeAddressesError, ListEmployeeAddressesQuery};
pub use department_history::{GetDepartmentHistoryError, GetDepartmentHistoryQuery};
pub use get::{GetEmployeeError, GetEmployeeQuery};
pub use list::{ListEmployeesError, ListEmployeesQuery};
pub use pay_history::{GetPayHistoryError, GetPayHistoryQuery};
