//! Record a pay rate change

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::employees::types::{insert_pay_history, validate_pay, PayHistoryEntry};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddPayHistoryCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    pub rate_change_date: NaiveDate,
    #[schema(value_type = String)]
    pub rate: BigDecimal,
    pub pay_frequency: i16,
}

#[derive(Debug, thiserror::Error)]
pub enum AddPayHistoryError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Rate change date {date} must be after the latest change on {latest}")]
    NotAfterLatest { date: NaiveDate, latest: NaiveDate },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AddPayHistoryError> for AppError {
    fn from(e: AddPayHistoryError) -> Self {
        match e {
            AddPayHistoryError::Validation(e) => AppError::Validation(e.to_string()),
            AddPayHistoryError::NotFound(_) => AppError::NotFound(e.to_string()),
            AddPayHistoryError::NotAfterLatest { .. } => AppError::InvalidOperation(e.to_string()),
            AddPayHistoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<PayHistoryEntry, AddPayHistoryError>> for AddPayHistoryCommand {}

impl crate::cqrs::middleware::Command for AddPayHistoryCommand {}

impl AddPayHistoryCommand {
    pub fn validate(&self) -> Result<(), AddPayHistoryError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        validate_pay(&self.rate, self.pay_frequency)?;
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(business_entity_id = command.business_entity_id, rate_change_date = %command.rate_change_date)
)]
pub async fn handle(
    pool: PgPool,
    command: AddPayHistoryCommand,
) -> Result<PayHistoryEntry, AddPayHistoryError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    // Row lock serialises concurrent rate changes for the same employee
    sqlx::query_scalar::<_, i32>(
        "SELECT business_entity_id FROM humanresources.employee
         WHERE business_entity_id = $1
         FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AddPayHistoryError::NotFound(id))?;

    let latest: Option<NaiveDate> = sqlx::query_scalar(
        "SELECT MAX(rate_change_date) FROM humanresources.employee_pay_history
         WHERE business_entity_id = $1",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(latest) = latest {
        if command.rate_change_date <= latest {
            return Err(AddPayHistoryError::NotAfterLatest {
                date: command.rate_change_date,
                latest,
            });
        }
    }

    let entry = insert_pay_history(
        &mut tx,
        id,
        command.rate_change_date,
        &command.rate,
        command.pay_frequency,
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Pay rate change recorded");

    Ok(entry)
}
