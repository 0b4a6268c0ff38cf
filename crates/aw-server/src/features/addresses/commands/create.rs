//! Create address command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::addresses::types::{insert_address, state_province_exists, Address, AddressInput};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAddressCommand {
    #[serde(flatten)]
    pub address: AddressInput,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateAddressError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("State/province {0} not found")]
    StateProvinceNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateAddressError> for AppError {
    fn from(e: CreateAddressError) -> Self {
        match e {
            CreateAddressError::Validation(e) => AppError::Validation(e.to_string()),
            CreateAddressError::StateProvinceNotFound(_) => AppError::NotFound(e.to_string()),
            CreateAddressError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Address, CreateAddressError>> for CreateAddressCommand {}

impl crate::cqrs::middleware::Command for CreateAddressCommand {}

impl CreateAddressCommand {
    pub fn validate(&self) -> Result<(), CreateAddressError> {
        self.address.validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(city = %command.address.city))]
pub async fn handle(pool: PgPool, command: CreateAddressCommand) -> Result<Address, CreateAddressError> {
    command.validate()?;

    let mut conn = pool.acquire().await?;
    if !state_province_exists(&mut conn, command.address.state_province_id).await? {
        return Err(CreateAddressError::StateProvinceNotFound(
            command.address.state_province_id,
        ));
    }

    let address = insert_address(&mut conn, &command.address).await?;

    tracing::info!(address_id = address.address_id, "Address created");

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateAddressCommand {
        serde_json::from_value(serde_json::json!({
            "address_line1": "1970 Napa Ct.",
            "city": "Bothell",
            "state_province_id": 1,
            "postal_code": "98011"
        }))
        .unwrap()
    }

    #[test]
    fn test_flattened_body() {
        let command = command();
        assert_eq!(command.address.city, "Bothell");
        assert!(command.address.address_line2.is_none());
        assert!(command.validate().is_ok());
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_unknown_state_province(pool: PgPool) -> sqlx::Result<()> {
        let mut command = command();
        command.address.state_province_id = 9999;
        let result = handle(pool, command).await;
        assert!(matches!(result, Err(CreateAddressError::StateProvinceNotFound(9999))));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_creates_address(pool: PgPool) -> sqlx::Result<()> {
        let address = handle(pool, command()).await.unwrap();
        assert!(address.address_id > 0);
        assert_eq!(address.postal_code, "98011");
        Ok(())
    }
}
