pub mod add_address;
pub mod add_pay_history;
pub mod create;
pub mod delete;
pub mod hire;
pub mod patch;
pub mod rehire;
pub mod terminate;
pub mod update;

mod transition;

pub use add_address::{AddEmployeeAddressCommand, AddEmployeeAddressError};
pub use add_pay_history::{AddPayHistoryCommand, AddPayHistoryError};
pub use create::{CreateEmployeeCommand, CreateEmployeeError, NewEmployeeAddress};
pub use delete::{DeleteEmployeeCommand, DeleteEmployeeError};
pub use hire::{HireEmployeeCommand, HireEmployeeError};
pub use patch::{PatchEmployeeCommand, PatchEmployeeError};
pub use rehire::{RehireEmployeeCommand, RehireEmployeeError};
pub use terminate::{TerminateEmployeeCommand, TerminateEmployeeError};
pub use transition::LifecycleResponse;
pub use update::{UpdateEmployeeCommand, UpdateEmployeeError};
