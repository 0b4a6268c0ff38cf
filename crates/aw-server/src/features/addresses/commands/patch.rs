use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::addresses::types::{
    state_province_exists, Address, ADDRESS_COLUMNS, ADDRESS_LINE_MAX, CITY_MAX, POSTAL_CODE_MAX,
};
use crate::features::shared::validation::{validate_optional_text, validate_required_text, FieldError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PatchAddressCommand {
    #[serde(skip)]
    pub address_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_province_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatchAddressError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Address {0} not found")]
    NotFound(i32),

    #[error("State/province {0} not found")]
    StateProvinceNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PatchAddressError> for AppError {
    fn from(e: PatchAddressError) -> Self {
        match e {
            PatchAddressError::Validation(e) => AppError::Validation(e.to_string()),
            PatchAddressError::NotFound(_) | PatchAddressError::StateProvinceNotFound(_) => {
                AppError::NotFound(e.to_string())
            },
            PatchAddressError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Address, PatchAddressError>> for PatchAddressCommand {}

impl crate::cqrs::middleware::Command for PatchAddressCommand {}

impl PatchAddressCommand {
    fn is_empty(&self) -> bool {
        self.address_line1.is_none()
            && self.address_line2.is_none()
            && self.city.is_none()
            && self.state_province_id.is_none()
            && self.postal_code.is_none()
    }

    pub fn validate(&self) -> Result<(), PatchAddressError> {
        if self.address_id <= 0 {
            return Err(FieldError::invalid("address_id", "must be greater than 0").into());
        }
        if self.is_empty() {
            return Err(FieldError::NoFieldsToUpdate.into());
        }
        if let Some(ref line1) = self.address_line1 {
            validate_required_text(line1, "address_line1", ADDRESS_LINE_MAX)?;
        }
        validate_optional_text(self.address_line2.as_deref(), "address_line2", ADDRESS_LINE_MAX)?;
        if let Some(ref city) = self.city {
            validate_required_text(city, "city", CITY_MAX)?;
        }
        if let Some(ref postal_code) = self.postal_code {
            validate_required_text(postal_code, "postal_code", POSTAL_CODE_MAX)?;
        }
        if matches!(self.state_province_id, Some(id) if id <= 0) {
            return Err(FieldError::invalid("state_province_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(address_id = command.address_id))]
pub async fn handle(pool: PgPool, command: PatchAddressCommand) -> Result<Address, PatchAddressError> {
    command.validate()?;

    let mut conn = pool.acquire().await?;
    if let Some(state_province_id) = command.state_province_id {
        if !state_province_exists(&mut conn, state_province_id).await? {
            return Err(PatchAddressError::StateProvinceNotFound(state_province_id));
        }
    }

    let address = sqlx::query_as::<_, Address>(&format!(
        "UPDATE person.address
         SET address_line1 = COALESCE($2, address_line1),
             address_line2 = COALESCE($3, address_line2),
             city = COALESCE($4, city),
             state_province_id = COALESCE($5, state_province_id),
             postal_code = COALESCE($6, postal_code),
             modified_date = NOW()
         WHERE address_id = $1
         RETURNING {ADDRESS_COLUMNS}"
    ))
    .bind(command.address_id)
    .bind(command.address_line1.as_deref().map(str::trim))
    .bind(command.address_line2.as_deref().map(str::trim))
    .bind(command.city.as_deref().map(str::trim))
    .bind(command.state_province_id)
    .bind(command.postal_code.as_deref().map(str::trim))
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(PatchAddressError::NotFound(command.address_id))?;

    tracing::info!("Address patched");

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_is_rejected() {
        let command = PatchAddressCommand {
            address_id: 1,
            ..Default::default()
        };
        assert!(matches!(
            command.validate(),
            Err(PatchAddressError::Validation(FieldError::NoFieldsToUpdate))
        ));
    }

    #[test]
    fn test_patch_checks_present_fields() {
        let command = PatchAddressCommand {
            address_id: 1,
            city: Some("c".repeat(31)),
            ..Default::default()
        };
        assert!(command.validate().is_err());

        let command = PatchAddressCommand {
            address_id: 1,
            postal_code: Some("98052".to_string()),
            ..Default::default()
        };
        assert!(command.validate().is_ok());
    }
}
