//! OpenAPI document served at `/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::addresses::commands::{
    CreateAddressCommand, PatchAddressCommand, UpdateAddressCommand,
};
use crate::features::addresses::{Address, AddressInput, AddressType, StateProvince};
use crate::features::departments::commands::{
    CreateDepartmentCommand, PatchDepartmentCommand, UpdateDepartmentCommand,
};
use crate::features::departments::Department;
use crate::features::employees::commands::{
    AddEmployeeAddressCommand, AddPayHistoryCommand, CreateEmployeeCommand, HireEmployeeCommand,
    LifecycleResponse, NewEmployeeAddress, PatchEmployeeCommand, RehireEmployeeCommand,
    TerminateEmployeeCommand, UpdateEmployeeCommand,
};
use crate::features::employees::lifecycle::LifecycleAction;
use crate::features::employees::types::PersonName;
use crate::features::employees::{
    DepartmentHistoryEntry, EmployeeAddress, EmployeeDetails, EmployeeSummary, PayHistoryEntry,
};
use crate::features::sales_persons::commands::{
    CreateSalesPersonCommand, UpdateSalesPersonCommand,
};
use crate::features::sales_persons::{SalesPerson, SalesTerritory};
use crate::features::shared::PaginationMetadata;
use crate::features::shifts::commands::{CreateShiftCommand, UpdateShiftCommand};
use crate::features::shifts::Shift;
use crate::features::stores::commands::{CreateStoreCommand, UpdateStoreCommand};
use crate::features::stores::Store;

pub const BEARER_SCHEME: &str = "bearer_auth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AdventureWorks HR/Sales API",
        description = "Employees, departments, shifts, addresses, sales persons and stores"
    ),
    components(schemas(
        PaginationMetadata,
        Department, CreateDepartmentCommand, UpdateDepartmentCommand, PatchDepartmentCommand,
        Shift, CreateShiftCommand, UpdateShiftCommand,
        Address, AddressInput, AddressType, StateProvince,
        CreateAddressCommand, UpdateAddressCommand, PatchAddressCommand,
        PersonName, EmployeeSummary, EmployeeDetails, DepartmentHistoryEntry, PayHistoryEntry,
        EmployeeAddress, NewEmployeeAddress, CreateEmployeeCommand, UpdateEmployeeCommand,
        PatchEmployeeCommand, AddPayHistoryCommand, AddEmployeeAddressCommand,
        HireEmployeeCommand, TerminateEmployeeCommand, RehireEmployeeCommand,
        LifecycleAction, LifecycleResponse,
        SalesPerson, SalesTerritory, CreateSalesPersonCommand, UpdateSalesPersonCommand,
        Store, CreateStoreCommand, UpdateStoreCommand,
    )),
    modifiers(&BearerAuth),
    security(("bearer_auth" = [])),
    tags(
        (name = "departments"), (name = "shifts"), (name = "addresses"),
        (name = "employees"), (name = "sales-persons"), (name = "stores")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_schemas_and_bearer_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let components = &doc["components"];
        for schema in ["EmployeeDetails", "RehireEmployeeCommand", "SalesPerson", "Store"] {
            assert!(components["schemas"].get(schema).is_some(), "{schema}");
        }
        assert_eq!(components["securitySchemes"][BEARER_SCHEME]["scheme"], "bearer");
    }
}
