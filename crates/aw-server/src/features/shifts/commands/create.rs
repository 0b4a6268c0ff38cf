//! Create shift command

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
pub struct CreateShiftCommand {
    pub name: String,
    /// `HH:MM:SS`
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateShiftError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("A shift with name '{0}' or the same start and end time already exists")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateShiftError> for AppError {
    fn from(e: CreateShiftError) -> Self {
        match e {
            CreateShiftError::Validation(e) => AppError::Validation(e.to_string()),
            CreateShiftError::Duplicate(_) => AppError::Conflict(e.to_string()),
            CreateShiftError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Shift, CreateShiftError>> for CreateShiftCommand {}

impl crate::cqrs::middleware::Command for CreateShiftCommand {}

impl CreateShiftCommand {
    pub fn validate(&self) -> Result<(), CreateShiftError> {
        validate_shift_fields(&self.name, self.start_time, self.end_time)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(pool: PgPool, command: CreateShiftCommand) -> Result<Shift, CreateShiftError> {
    command.validate()?;

    let shift = sqlx::query_as::<_, Shift>(&format!(
        "INSERT INTO humanresources.shift (name, start_time, end_time, modified_date)
         VALUES ($1, $2, $3, NOW())
         RETURNING {SHIFT_COLUMNS}"
    ))
    .bind(command.name.trim())
    .bind(command.start_time)
    .bind(command.end_time)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(e, CreateShiftError::Duplicate(command.name.clone()), Into::into)
    })?;

    tracing::info!(shift_id = shift.shift_id, "Shift created");

    Ok(shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(start: u32, end: u32) -> CreateShiftCommand {
        CreateShiftCommand {
            name: "Evening".to_string(),
            start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_validation() {
        assert!(command(15, 23).validate().is_ok());
        assert!(matches!(command(15, 15).validate(), Err(CreateShiftError::Validation(_))));
    }

    #[test]
    fn test_deserialize_times() {
        let cmd: CreateShiftCommand = serde_json::from_str(
            r#"{"name": "Day", "start_time": "07:00:00", "end_time": "15:00:00"}"#,
        )
        .unwrap();
        assert_eq!(cmd.start_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_rejects_duplicate_times(pool: PgPool) -> sqlx::Result<()> {
        handle(pool.clone(), command(15, 23)).await.unwrap();

        let mut clash = command(15, 23);
        clash.name = "Late".to_string();
        assert!(matches!(handle(pool, clash).await, Err(CreateShiftError::Duplicate(_))));
        Ok(())
    }
}
