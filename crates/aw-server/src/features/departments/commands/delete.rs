//! Delete department command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::error_helpers::map_foreign_key_violation;
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDepartmentCommand {
    pub department_id: i16,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteDepartmentError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Department {0} not found")]
    NotFound(i16),

    #[error("Department {0} is referenced by employee department history")]
    InUse(i16),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteDepartmentError> for AppError {
    fn from(e: DeleteDepartmentError) -> Self {
        match e {
            DeleteDepartmentError::Validation(e) => AppError::Validation(e.to_string()),
            DeleteDepartmentError::NotFound(_) => AppError::NotFound(e.to_string()),
            DeleteDepartmentError::InUse(_) => AppError::Conflict(e.to_string()),
            DeleteDepartmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<(), DeleteDepartmentError>> for DeleteDepartmentCommand {}

impl crate::cqrs::middleware::Command for DeleteDepartmentCommand {}

impl DeleteDepartmentCommand {
    pub fn validate(&self) -> Result<(), DeleteDepartmentError> {
        if self.department_id <= 0 {
            return Err(FieldError::invalid("department_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool), fields(department_id = command.department_id))]
pub async fn handle(pool: PgPool, command: DeleteDepartmentCommand) -> Result<(), DeleteDepartmentError> {
    command.validate()?;
    let id = command.department_id;

    let referenced: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM humanresources.employee_department_history WHERE department_id = $1
         )",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?;

    if referenced {
        return Err(DeleteDepartmentError::InUse(id));
    }

    let result = sqlx::query("DELETE FROM humanresources.department WHERE department_id = $1")
        .bind(id)
        .execute(&pool)
        .await
        // A history row inserted after the check still trips the foreign key
        .map_err(|e| map_foreign_key_violation(e, DeleteDepartmentError::InUse(id), Into::into))?;

    if result.rows_affected() == 0 {
        return Err(DeleteDepartmentError::NotFound(id));
    }

    tracing::info!("Department deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_use_maps_to_conflict() {
        let err: AppError = DeleteDepartmentError::InUse(3).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_deletes_and_reports_missing(pool: PgPool) -> sqlx::Result<()> {
        let id: i16 = sqlx::query_scalar(
            "INSERT INTO humanresources.department (name, group_name)
             VALUES ('Facilities', 'Executive General and Administration') RETURNING department_id",
        )
        .fetch_one(&pool)
        .await?;

        handle(pool.clone(), DeleteDepartmentCommand { department_id: id })
            .await
            .unwrap();
        let again = handle(pool, DeleteDepartmentCommand { department_id: id }).await;
        assert!(matches!(again, Err(DeleteDepartmentError::NotFound(_))));
        Ok(())
    }
}
