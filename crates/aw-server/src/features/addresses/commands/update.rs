use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::addresses::types::{state_province_exists, Address, AddressInput, ADDRESS_COLUMNS};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateAddressCommand {
    #[serde(skip)]
    pub address_id: i32,
    #[serde(flatten)]
    pub address: AddressInput,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateAddressError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Address {0} not found")]
    NotFound(i32),

    #[error("State/province {0} not found")]
    StateProvinceNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateAddressError> for AppError {
    fn from(e: UpdateAddressError) -> Self {
        match e {
            UpdateAddressError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateAddressError::NotFound(_) | UpdateAddressError::StateProvinceNotFound(_) => {
                AppError::NotFound(e.to_string())
            },
            UpdateAddressError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Address, UpdateAddressError>> for UpdateAddressCommand {}

impl crate::cqrs::middleware::Command for UpdateAddressCommand {}

impl UpdateAddressCommand {
    pub fn validate(&self) -> Result<(), UpdateAddressError> {
        if self.address_id <= 0 {
            return Err(FieldError::invalid("address_id", "must be greater than 0").into());
        }
        self.address.validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(address_id = command.address_id))]
pub async fn handle(pool: PgPool, command: UpdateAddressCommand) -> Result<Address, UpdateAddressError> {
    command.validate()?;
    let input = &command.address;

    let mut conn = pool.acquire().await?;
    if !state_province_exists(&mut conn, input.state_province_id).await? {
        return Err(UpdateAddressError::StateProvinceNotFound(input.state_province_id));
    }

    let address = sqlx::query_as::<_, Address>(&format!(
        "UPDATE person.address
         SET address_line1 = $2, address_line2 = $3, city = $4,
             state_province_id = $5, postal_code = $6, modified_date = NOW()
         WHERE address_id = $1
         RETURNING {ADDRESS_COLUMNS}"
    ))
    .bind(command.address_id)
    .bind(input.address_line1.trim())
    .bind(input.address_line2.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    .bind(input.city.trim())
    .bind(input.state_province_id)
    .bind(input.postal_code.trim())
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(UpdateAddressError::NotFound(command.address_id))?;

    tracing::info!("Address updated");

    Ok(address)
}
