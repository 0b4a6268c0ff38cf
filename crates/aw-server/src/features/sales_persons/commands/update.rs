use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::sales_persons::types::{
    load_sales_person, territory_exists, validate_compensation, validate_territory_id, SalesPerson,
};
use crate::features::shared::validation::FieldError;

/// Replace quota, bonus, commission and territory
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSalesPersonCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    pub territory_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub sales_quota: Option<BigDecimal>,
    #[schema(value_type = String)]
    pub bonus: BigDecimal,
    #[schema(value_type = String)]
    pub commission_pct: BigDecimal,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateSalesPersonError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Sales person {0} not found")]
    NotFound(i32),

    #[error("Sales territory {0} not found")]
    TerritoryNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateSalesPersonError> for AppError {
    fn from(e: UpdateSalesPersonError) -> Self {
        match e {
            UpdateSalesPersonError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateSalesPersonError::NotFound(_) | UpdateSalesPersonError::TerritoryNotFound(_) => {
                AppError::NotFound(e.to_string())
            },
            UpdateSalesPersonError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<SalesPerson, UpdateSalesPersonError>> for UpdateSalesPersonCommand {}

impl crate::cqrs::middleware::Command for UpdateSalesPersonCommand {}

impl UpdateSalesPersonCommand {
    pub fn validate(&self) -> Result<(), UpdateSalesPersonError> {
        validate_territory_id(self.territory_id)?;
        validate_compensation(self.sales_quota.as_ref(), &self.bonus, &self.commission_pct)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(business_entity_id = command.business_entity_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateSalesPersonCommand,
) -> Result<SalesPerson, UpdateSalesPersonError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut conn = pool.acquire().await?;

    if let Some(territory_id) = command.territory_id {
        if !territory_exists(&mut conn, territory_id).await? {
            return Err(UpdateSalesPersonError::TerritoryNotFound(territory_id));
        }
    }

    let result = sqlx::query(
        "UPDATE sales.sales_person
         SET territory_id = $2, sales_quota = $3, bonus = $4, commission_pct = $5,
             modified_date = NOW()
         WHERE business_entity_id = $1",
    )
    .bind(id)
    .bind(command.territory_id)
    .bind(command.sales_quota.as_ref())
    .bind(&command.bonus)
    .bind(&command.commission_pct)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(UpdateSalesPersonError::NotFound(id));
    }

    load_sales_person(&mut conn, id)
        .await?
        .ok_or(UpdateSalesPersonError::NotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_id_is_not_read_from_body() {
        let cmd: UpdateSalesPersonCommand = serde_json::from_str(
            r#"{"business_entity_id": 5, "bonus": "0", "commission_pct": "0.01"}"#,
        )
        .unwrap();
        assert_eq!(cmd.business_entity_id, 0);
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_bonus_is_required() {
        let result: Result<UpdateSalesPersonCommand, _> =
            serde_json::from_str(r#"{"commission_pct": "0.01"}"#);
        assert!(result.is_err());
    }
}
