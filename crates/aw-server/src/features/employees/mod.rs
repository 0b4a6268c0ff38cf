//! Employees
//!
//! An employee is a `person.person` row of type `EM` extended by
//! `humanresources.employee`. Assignment to a department and shift is tracked
//! in `employee_department_history`; the row with no `end_date` is the current
//! assignment. Pay changes are append-only in `employee_pay_history`.
//!
//! Hire, terminate and rehire are modelled as pure transitions in
//! [`lifecycle`] and persisted by their command handlers inside one
//! transaction.

pub mod commands;
pub mod lifecycle;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::employees_routes;
pub use types::{DepartmentHistoryEntry, EmployeeAddress, EmployeeDetails, EmployeeSummary, PayHistoryEntry};
