use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::validation::FieldError;
use crate::features::shifts::types::{Shift, SHIFT_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetShiftQuery {
    pub shift_id: i16,
}

#[derive(Debug, thiserror::Error)]
pub enum GetShiftError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Shift {0} not found")]
    NotFound(i16),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetShiftError> for AppError {
    fn from(e: GetShiftError) -> Self {
        match e {
            GetShiftError::Validation(e) => AppError::Validation(e.to_string()),
            GetShiftError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetShiftError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Shift, GetShiftError>> for GetShiftQuery {}

impl crate::cqrs::middleware::Query for GetShiftQuery {}

impl GetShiftQuery {
    pub fn validate(&self) -> Result<(), GetShiftError> {
        if self.shift_id <= 0 {
            return Err(FieldError::invalid("shift_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetShiftQuery) -> Result<Shift, GetShiftError> {
    query.validate()?;

    sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM humanresources.shift WHERE shift_id = $1"
    ))
    .bind(query.shift_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetShiftError::NotFound(query.shift_id))
}
