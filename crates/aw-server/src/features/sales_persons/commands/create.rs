//! Promote an employee to sales person

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::sales_persons::types::{
    load_sales_person, sales_person_exists, territory_exists, validate_compensation,
    validate_territory_id, SalesPerson,
};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSalesPersonCommand {
    /// Id of an existing, current employee
    pub business_entity_id: i32,
    pub territory_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub sales_quota: Option<BigDecimal>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub bonus: BigDecimal,
    /// Fraction between 0 and 1
    #[serde(default)]
    #[schema(value_type = String)]
    pub commission_pct: BigDecimal,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateSalesPersonError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    EmployeeNotFound(i32),

    #[error("Employee {0} is not a current employee")]
    NotCurrent(i32),

    #[error("Employee {0} is already a sales person")]
    AlreadyExists(i32),

    #[error("Sales territory {0} not found")]
    TerritoryNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateSalesPersonError> for AppError {
    fn from(e: CreateSalesPersonError) -> Self {
        match e {
            CreateSalesPersonError::Validation(e) => AppError::Validation(e.to_string()),
            CreateSalesPersonError::EmployeeNotFound(_)
            | CreateSalesPersonError::TerritoryNotFound(_) => AppError::NotFound(e.to_string()),
            CreateSalesPersonError::NotCurrent(_) => AppError::InvalidOperation(e.to_string()),
            CreateSalesPersonError::AlreadyExists(_) => AppError::Conflict(e.to_string()),
            CreateSalesPersonError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<SalesPerson, CreateSalesPersonError>> for CreateSalesPersonCommand {}

impl crate::cqrs::middleware::Command for CreateSalesPersonCommand {}

impl CreateSalesPersonCommand {
    pub fn validate(&self) -> Result<(), CreateSalesPersonError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        validate_territory_id(self.territory_id)?;
        validate_compensation(self.sales_quota.as_ref(), &self.bonus, &self.commission_pct)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(business_entity_id = command.business_entity_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateSalesPersonCommand,
) -> Result<SalesPerson, CreateSalesPersonError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let current: Option<bool> = sqlx::query_scalar(
        "SELECT current_flag FROM humanresources.employee
         WHERE business_entity_id = $1
         FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    match current {
        None => return Err(CreateSalesPersonError::EmployeeNotFound(id)),
        Some(false) => return Err(CreateSalesPersonError::NotCurrent(id)),
        Some(true) => {},
    }

    if sales_person_exists(&mut tx, id).await? {
        return Err(CreateSalesPersonError::AlreadyExists(id));
    }

    if let Some(territory_id) = command.territory_id {
        if !territory_exists(&mut tx, territory_id).await? {
            return Err(CreateSalesPersonError::TerritoryNotFound(territory_id));
        }
    }

    sqlx::query(
        "INSERT INTO sales.sales_person
             (business_entity_id, territory_id, sales_quota, bonus, commission_pct,
              sales_ytd, sales_last_year, rowguid, modified_date)
         VALUES ($1, $2, $3, $4, $5, 0, 0, $6, NOW())",
    )
    .bind(id)
    .bind(command.territory_id)
    .bind(command.sales_quota.as_ref())
    .bind(&command.bonus)
    .bind(&command.commission_pct)
    .bind(Uuid::new_v4())
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE person.person SET person_type = 'SP', modified_date = NOW()
         WHERE business_entity_id = $1",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let sales_person = load_sales_person(&mut tx, id)
        .await?
        .ok_or(CreateSalesPersonError::EmployeeNotFound(id))?;

    tx.commit().await?;

    tracing::info!(territory_id = ?command.territory_id, "Sales person created");

    Ok(sales_person)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(json: serde_json::Value) -> CreateSalesPersonCommand {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_defaults_to_zero_bonus_and_commission() {
        let cmd = command(serde_json::json!({ "business_entity_id": 274 }));
        assert_eq!(cmd.bonus, BigDecimal::from(0));
        assert_eq!(cmd.commission_pct, BigDecimal::from(0));
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let cmd = command(serde_json::json!({
            "business_entity_id": 275,
            "territory_id": 2,
            "sales_quota": "300000.00",
            "bonus": "4100.00",
            "commission_pct": "0.012"
        }));
        assert!(cmd.validate().is_ok());

        let cmd = command(serde_json::json!({ "business_entity_id": 275, "commission_pct": "1.5" }));
        assert!(matches!(cmd.validate(), Err(CreateSalesPersonError::Validation(_))));

        let cmd = command(serde_json::json!({ "business_entity_id": 0 }));
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_error_statuses() {
        use axum::http::StatusCode;
        let status = |e: CreateSalesPersonError| AppError::from(e).status();
        assert_eq!(status(CreateSalesPersonError::EmployeeNotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(status(CreateSalesPersonError::NotCurrent(1)), StatusCode::BAD_REQUEST);
        assert_eq!(status(CreateSalesPersonError::AlreadyExists(1)), StatusCode::CONFLICT);
        assert_eq!(status(CreateSalesPersonError::TerritoryNotFound(1)), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_missing_employee_is_not_found(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool, command(serde_json::json!({ "business_entity_id": 9999 }))).await;
        assert!(matches!(result, Err(CreateSalesPersonError::EmployeeNotFound(9999))));
        Ok(())
    }
}
