use chrono::NaiveTime;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::FieldError;
use crate::features::shifts::types::{validate_shift_fields, Shift, SHIFT_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateShiftCommand {
    #[serde(skip)]
    pub shift_id: i16,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateShiftError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Shift {0} not found")]
    NotFound(i16),

    #[error("A shift with name '{0}' or the same start and end time already exists")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateShiftError> for AppError {
    fn from(e: UpdateShiftError) -> Self {
        match e {
            UpdateShiftError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateShiftError::NotFound(_) => AppError::NotFound(e.to_string()),
            UpdateShiftError::Duplicate(_) => AppError::Conflict(e.to_string()),
            UpdateShiftError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Shift, UpdateShiftError>> for UpdateShiftCommand {}

impl crate::cqrs::middleware::Command for UpdateShiftCommand {}

impl UpdateShiftCommand {
    pub fn validate(&self) -> Result<(), UpdateShiftError> {
        if self.shift_id <= 0 {
            return Err(FieldError::invalid("shift_id", "must be greater than 0").into());
        }
        validate_shift_fields(&self.name, self.start_time, self.end_time)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(shift_id = command.shift_id))]
pub async fn handle(pool: PgPool, command: UpdateShiftCommand) -> Result<Shift, UpdateShiftError> {
    command.validate()?;

    let shift = sqlx::query_as::<_, Shift>(&format!(
        "UPDATE humanresources.shift
         SET name = $2, start_time = $3, end_time = $4, modified_date = NOW()
         WHERE shift_id = $1
         RETURNING {SHIFT_COLUMNS}"
    ))
    .bind(command.shift_id)
    .bind(command.name.trim())
    .bind(command.start_time)
    .bind(command.end_time)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(e, UpdateShiftError::Duplicate(command.name.clone()), Into::into)
    })?
    .ok_or(UpdateShiftError::NotFound(command.shift_id))?;

    tracing::info!("Shift updated");

    Ok(shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_id() {
        let command = UpdateShiftCommand {
            shift_id: 0,
            name: "Day".to_string(),
            start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        };
        assert!(command.validate().is_err());
    }
}
