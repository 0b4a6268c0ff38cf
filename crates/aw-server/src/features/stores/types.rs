use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::shared::validation::{validate_required_text, FieldError};

pub const STORE_NAME_MAX: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Store {
    pub business_entity_id: i32,
    pub name: String,
    pub sales_person_id: Option<i32>,
    /// Free-form survey data
    pub demographics: Option<String>,
    pub rowguid: Uuid,
    pub modified_date: DateTime<Utc>,
}

pub(crate) const STORE_COLUMNS: &str =
    "business_entity_id, name, sales_person_id, demographics, rowguid, modified_date";

pub(crate) fn validate_store_fields(name: &str, sales_person_id: Option<i32>) -> Result<(), FieldError> {
    validate_required_text(name, "name", STORE_NAME_MAX)?;
    if let Some(id) = sales_person_id {
        if id <= 0 {
            return Err(FieldError::invalid("sales_person_id", "must be greater than 0"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_fields() {
        assert!(validate_store_fields("Next-Door Bike Store", Some(279)).is_ok());
        assert!(validate_store_fields("Bikes", None).is_ok());
        assert!(matches!(validate_store_fields("  ", None), Err(FieldError::Required { .. })));
        assert!(matches!(
            validate_store_fields(&"x".repeat(51), None),
            Err(FieldError::TooLong { .. })
        ));
        assert!(validate_store_fields("Bikes", Some(0)).is_err());
    }
}
