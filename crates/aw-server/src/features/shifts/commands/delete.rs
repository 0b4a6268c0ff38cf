use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::error_helpers::map_foreign_key_violation;
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteShiftCommand {
    pub shift_id: i16,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteShiftError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Shift {0} not found")]
    NotFound(i16),

    #[error("Shift {0} is referenced by employee department history")]
    InUse(i16),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteShiftError> for AppError {
    fn from(e: DeleteShiftError) -> Self {
        match e {
            DeleteShiftError::Validation(e) => AppError::Validation(e.to_string()),
            DeleteShiftError::NotFound(_) => AppError::NotFound(e.to_string()),
            DeleteShiftError::InUse(_) => AppError::Conflict(e.to_string()),
            DeleteShiftError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<(), DeleteShiftError>> for DeleteShiftCommand {}

impl crate::cqrs::middleware::Command for DeleteShiftCommand {}

impl DeleteShiftCommand {
    pub fn validate(&self) -> Result<(), DeleteShiftError> {
        if self.shift_id <= 0 {
            return Err(FieldError::invalid("shift_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, command: DeleteShiftCommand) -> Result<(), DeleteShiftError> {
    command.validate()?;
    let id = command.shift_id;

    let referenced: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM humanresources.employee_department_history WHERE shift_id = $1
         )",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?;

    if referenced {
        return Err(DeleteShiftError::InUse(id));
    }

    let result = sqlx::query("DELETE FROM humanresources.shift WHERE shift_id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, DeleteShiftError::InUse(id), Into::into))?;

    if result.rows_affected() == 0 {
        return Err(DeleteShiftError::NotFound(id));
    }

    tracing::info!("Shift deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert!(matches!(AppError::from(DeleteShiftError::InUse(1)), AppError::Conflict(_)));
        assert!(matches!(AppError::from(DeleteShiftError::NotFound(1)), AppError::NotFound(_)));
    }
}
