//! Replace a department's name and group

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::departments::types::{Department, DEPARTMENT_COLUMNS, DEPARTMENT_NAME_MAX};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_required_text, FieldError};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDepartmentCommand {
    /// Taken from the path
    #[serde(skip)]
    pub department_id: i16,
    pub name: String,
    pub group_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateDepartmentError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Department {0} not found")]
    NotFound(i16),

    #[error("Department '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateDepartmentError> for AppError {
    fn from(e: UpdateDepartmentError) -> Self {
        match e {
            UpdateDepartmentError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateDepartmentError::NotFound(_) => AppError::NotFound(e.to_string()),
            UpdateDepartmentError::DuplicateName(_) => AppError::Conflict(e.to_string()),
            UpdateDepartmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Department, UpdateDepartmentError>> for UpdateDepartmentCommand {}

impl crate::cqrs::middleware::Command for UpdateDepartmentCommand {}

impl UpdateDepartmentCommand {
    pub fn validate(&self) -> Result<(), UpdateDepartmentError> {
        if self.department_id <= 0 {
            return Err(FieldError::invalid("department_id", "must be greater than 0").into());
        }
        validate_required_text(&self.name, "name", DEPARTMENT_NAME_MAX)?;
        validate_required_text(&self.group_name, "group_name", DEPARTMENT_NAME_MAX)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(department_id = command.department_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateDepartmentCommand,
) -> Result<Department, UpdateDepartmentError> {
    command.validate()?;

    let department = sqlx::query_as::<_, Department>(&format!(
        "UPDATE humanresources.department
         SET name = $2, group_name = $3, modified_date = NOW()
         WHERE department_id = $1
         RETURNING {DEPARTMENT_COLUMNS}"
    ))
    .bind(command.department_id)
    .bind(command.name.trim())
    .bind(command.group_name.trim())
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            UpdateDepartmentError::DuplicateName(command.name.clone()),
            UpdateDepartmentError::Database,
        )
    })?
    .ok_or(UpdateDepartmentError::NotFound(command.department_id))?;

    tracing::info!("Department updated");

    Ok(department)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_positive_id() {
        let command = UpdateDepartmentCommand {
            department_id: 0,
            name: "Sales".to_string(),
            group_name: "Sales and Marketing".to_string(),
        };
        assert!(matches!(command.validate(), Err(UpdateDepartmentError::Validation(_))));
    }

    #[test]
    fn test_path_id_is_not_read_from_body() {
        let command: UpdateDepartmentCommand = serde_json::from_str(
            r#"{"department_id": 7, "name": "Sales", "group_name": "Sales and Marketing"}"#,
        )
        .unwrap();
        assert_eq!(command.department_id, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_missing_department(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(
            pool,
            UpdateDepartmentCommand {
                department_id: 999,
                name: "Sales".to_string(),
                group_name: "Sales and Marketing".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(UpdateDepartmentError::NotFound(999))));
        Ok(())
    }
}
