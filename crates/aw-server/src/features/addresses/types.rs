use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_optional_text, validate_required_text, FieldError,
};

pub const ADDRESS_LINE_MAX: usize = 60;
pub const CITY_MAX: usize = 30;
pub const POSTAL_CODE_MAX: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema, PartialEq, Eq)]
pub struct Address {
    pub address_id: i32,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province_id: i32,
    pub postal_code: String,
    pub rowguid: Uuid,
    pub modified_date: DateTime<Utc>,
}

pub(crate) const ADDRESS_COLUMNS: &str = "address_id, address_line1, address_line2, city, \
     state_province_id, postal_code, rowguid, modified_date";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema, PartialEq, Eq)]
pub struct AddressType {
    pub address_type_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema, PartialEq, Eq)]
pub struct StateProvince {
    pub state_province_id: i32,
    pub state_province_code: String,
    pub country_region_code: String,
    pub is_only_state_province_flag: bool,
    pub name: String,
    pub territory_id: i32,
}

/// Address fields as supplied by clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AddressInput {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province_id: i32,
    pub postal_code: String,
}

impl AddressInput {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_required_text(&self.address_line1, "address_line1", ADDRESS_LINE_MAX)?;
        validate_optional_text(self.address_line2.as_deref(), "address_line2", ADDRESS_LINE_MAX)?;
        validate_required_text(&self.city, "city", CITY_MAX)?;
        validate_required_text(&self.postal_code, "postal_code", POSTAL_CODE_MAX)?;
        if self.state_province_id <= 0 {
            return Err(FieldError::invalid("state_province_id", "must be greater than 0"));
        }
        Ok(())
    }
}

pub(crate) async fn state_province_exists(
    conn: &mut PgConnection,
    state_province_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM person.state_province WHERE state_province_id = $1)",
    )
    .bind(state_province_id)
    .fetch_one(conn)
    .await
}

pub(crate) async fn address_type_exists(
    conn: &mut PgConnection,
    address_type_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM person.address_type WHERE address_type_id = $1)")
        .bind(address_type_id)
        .fetch_one(conn)
        .await
}

/// Insert a validated address; the caller checks the state/province first
pub(crate) async fn insert_address(
    conn: &mut PgConnection,
    input: &AddressInput,
) -> Result<Address, sqlx::Error> {
    sqlx::query_as::<_, Address>(&format!(
        "INSERT INTO person.address
             (address_line1, address_line2, city, state_province_id, postal_code, rowguid, modified_date)
         VALUES ($1, $2, $3, $4, $5, $6, NOW())
         RETURNING {ADDRESS_COLUMNS}"
    ))
    .bind(input.address_line1.trim())
    .bind(input.address_line2.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    .bind(input.city.trim())
    .bind(input.state_province_id)
    .bind(input.postal_code.trim())
    .bind(Uuid::new_v4())
    .fetch_one(conn)
    .await
}

/// Link `address_id` to a business entity under the given address type
pub(crate) async fn link_address(
    conn: &mut PgConnection,
    business_entity_id: i32,
    address_id: i32,
    address_type_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO person.business_entity_address
             (business_entity_id, address_id, address_type_id, rowguid, modified_date)
         VALUES ($1, $2, $3, $4, NOW())",
    )
    .bind(business_entity_id)
    .bind(address_id)
    .bind(address_type_id)
    .bind(Uuid::new_v4())
    .execute(conn)
    .await
    .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AddressInput {
        AddressInput {
            address_line1: "1970 Napa Ct.".to_string(),
            address_line2: None,
            city: "Bothell".to_string(),
            state_province_id: 1,
            postal_code: "98011".to_string(),
        }
    }

    #[test]
    fn test_valid_address() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_length_limits() {
        let mut input = sample();
        input.city = "c".repeat(31);
        assert!(matches!(input.validate(), Err(FieldError::TooLong { field: "city", .. })));

        let mut input = sample();
        input.postal_code = "9".repeat(16);
        assert!(input.validate().is_err());

        let mut input = sample();
        input.address_line2 = Some("x".repeat(61));
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_state_province_must_be_positive() {
        let mut input = sample();
        input.state_province_id = 0;
        assert!(input.validate().is_err());
    }
}
