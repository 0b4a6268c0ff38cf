//! Create an address and link it to an employee

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::addresses::types::{
    address_type_exists, insert_address, link_address, state_province_exists, AddressInput,
};
use crate::features::employees::types::{employee_exists, EmployeeAddress};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddEmployeeAddressCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    pub address_type_id: i32,
    #[serde(flatten)]
    pub address: AddressInput,
}

#[derive(Debug, thiserror::Error)]
pub enum AddEmployeeAddressError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Address type {0} not found")]
    AddressTypeNotFound(i32),

    #[error("State/province {0} not found")]
    StateProvinceNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AddEmployeeAddressError> for AppError {
    fn from(e: AddEmployeeAddressError) -> Self {
        match e {
            AddEmployeeAddressError::Validation(e) => AppError::Validation(e.to_string()),
            AddEmployeeAddressError::NotFound(_)
            | AddEmployeeAddressError::AddressTypeNotFound(_)
            | AddEmployeeAddressError::StateProvinceNotFound(_) => AppError::NotFound(e.to_string()),
            AddEmployeeAddressError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<EmployeeAddress, AddEmployeeAddressError>> for AddEmployeeAddressCommand {}

impl crate::cqrs::middleware::Command for AddEmployeeAddressCommand {}

impl AddEmployeeAddressCommand {
    pub fn validate(&self) -> Result<(), AddEmployeeAddressError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        if self.address_type_id <= 0 {
            return Err(FieldError::invalid("address_type_id", "must be greater than 0").into());
        }
        self.address.validate()?;
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(business_entity_id = command.business_entity_id, address_type_id = command.address_type_id)
)]
pub async fn handle(
    pool: PgPool,
    command: AddEmployeeAddressCommand,
) -> Result<EmployeeAddress, AddEmployeeAddressError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    if !employee_exists(&mut tx, id).await? {
        return Err(AddEmployeeAddressError::NotFound(id));
    }
    if !address_type_exists(&mut tx, command.address_type_id).await? {
        return Err(AddEmployeeAddressError::AddressTypeNotFound(command.address_type_id));
    }
    if !state_province_exists(&mut tx, command.address.state_province_id).await? {
        return Err(AddEmployeeAddressError::StateProvinceNotFound(
            command.address.state_province_id,
        ));
    }

    let address = insert_address(&mut tx, &command.address).await?;
    link_address(&mut tx, id, address.address_id, command.address_type_id).await?;

    let address_type: String =
        sqlx::query_scalar("SELECT name FROM person.address_type WHERE address_type_id = $1")
            .bind(command.address_type_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    tracing::info!(address_id = address.address_id, "Employee address added");

    Ok(EmployeeAddress {
        address_id: address.address_id,
        address_type_id: command.address_type_id,
        address_type,
        address_line1: address.address_line1,
        address_line2: address.address_line2,
        city: address.city,
        state_province_id: address.state_province_id,
        postal_code: address.postal_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_body() {
        let command: AddEmployeeAddressCommand = serde_json::from_value(serde_json::json!({
            "address_type_id": 2,
            "address_line1": "7559 Worth Ct.",
            "city": "Renton",
            "state_province_id": 1,
            "postal_code": "98055"
        }))
        .unwrap();
        assert_eq!(command.address.city, "Renton");
        assert!(matches!(command.validate(), Err(AddEmployeeAddressError::Validation(_))));
    }
}
