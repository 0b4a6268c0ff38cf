use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use utoipa::ToSchema;

use crate::features::shared::validation::{validate_non_negative, FieldError};

/// Sales person joined with the employee's name and territory
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalesPerson {
    pub business_entity_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub territory_id: Option<i32>,
    pub territory_name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub sales_quota: Option<BigDecimal>,
    #[schema(value_type = String)]
    pub bonus: BigDecimal,
    #[schema(value_type = String)]
    pub commission_pct: BigDecimal,
    #[schema(value_type = String)]
    pub sales_ytd: BigDecimal,
    #[schema(value_type = String)]
    pub sales_last_year: BigDecimal,
    pub modified_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalesTerritory {
    pub territory_id: i32,
    pub name: String,
    pub country_region_code: String,
    pub group_name: String,
    #[schema(value_type = String)]
    pub sales_ytd: BigDecimal,
    #[schema(value_type = String)]
    pub sales_last_year: BigDecimal,
}

/// Quota, bonus and commission must be non-negative; commission is a fraction
pub fn validate_compensation(
    sales_quota: Option<&BigDecimal>,
    bonus: &BigDecimal,
    commission_pct: &BigDecimal,
) -> Result<(), FieldError> {
    if let Some(quota) = sales_quota {
        validate_non_negative(quota, "sales_quota")?;
    }
    validate_non_negative(bonus, "bonus")?;
    validate_non_negative(commission_pct, "commission_pct")?;
    if *commission_pct > BigDecimal::from(1) {
        return Err(FieldError::OutOfRange {
            field: "commission_pct",
            min: "0".to_string(),
            max: "1".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn validate_territory_id(territory_id: Option<i32>) -> Result<(), FieldError> {
    match territory_id {
        Some(id) if id <= 0 => Err(FieldError::invalid("territory_id", "must be greater than 0")),
        _ => Ok(()),
    }
}

pub(crate) async fn load_sales_person(
    conn: &mut PgConnection,
    business_entity_id: i32,
) -> Result<Option<SalesPerson>, sqlx::Error> {
    sqlx::query_as::<_, SalesPerson>(
        "SELECT sp.business_entity_id, p.first_name, p.last_name, e.job_title,
                sp.territory_id, t.name AS territory_name, sp.sales_quota, sp.bonus,
                sp.commission_pct, sp.sales_ytd, sp.sales_last_year, sp.modified_date
         FROM sales.sales_person sp
         JOIN humanresources.employee e ON e.business_entity_id = sp.business_entity_id
         JOIN person.person p ON p.business_entity_id = sp.business_entity_id
         LEFT JOIN sales.sales_territory t ON t.territory_id = sp.territory_id
         WHERE sp.business_entity_id = $1",
    )
    .bind(business_entity_id)
    .fetch_optional(conn)
    .await
}

pub(crate) async fn territory_exists(
    conn: &mut PgConnection,
    territory_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sales.sales_territory WHERE territory_id = $1)",
    )
    .bind(territory_id)
    .fetch_one(conn)
    .await
}

pub(crate) async fn sales_person_exists(
    conn: &mut PgConnection,
    business_entity_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sales.sales_person WHERE business_entity_id = $1)",
    )
    .bind(business_entity_id)
    .fetch_one(conn)
    .await
}
