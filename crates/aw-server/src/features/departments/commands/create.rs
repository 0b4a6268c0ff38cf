//! Create department command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::departments::types::{Department, DEPARTMENT_COLUMNS, DEPARTMENT_NAME_MAX};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_required_text, FieldError};

/// Create a department
///
/// ```rust,ignore
/// let command = CreateDepartmentCommand {
///     name: "Tool Design".to_string(),
///     group_name: "Research and Development".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDepartmentCommand {
    pub name: String,
    pub group_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateDepartmentError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Department '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateDepartmentError> for AppError {
    fn from(e: CreateDepartmentError) -> Self {
        match e {
            CreateDepartmentError::Validation(e) => AppError::Validation(e.to_string()),
            CreateDepartmentError::DuplicateName(_) => AppError::Conflict(e.to_string()),
            CreateDepartmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Department, CreateDepartmentError>> for CreateDepartmentCommand {}

impl crate::cqrs::middleware::Command for CreateDepartmentCommand {}

impl CreateDepartmentCommand {
    pub fn validate(&self) -> Result<(), CreateDepartmentError> {
        validate_required_text(&self.name, "name", DEPARTMENT_NAME_MAX)?;
        validate_required_text(&self.group_name, "group_name", DEPARTMENT_NAME_MAX)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateDepartmentCommand,
) -> Result<Department, CreateDepartmentError> {
    command.validate()?;

    let department = sqlx::query_as::<_, Department>(&format!(
        "INSERT INTO humanresources.department (name, group_name, modified_date)
         VALUES ($1, $2, NOW())
         RETURNING {DEPARTMENT_COLUMNS}"
    ))
    .bind(command.name.trim())
    .bind(command.group_name.trim())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CreateDepartmentError::DuplicateName(command.name.clone()),
            CreateDepartmentError::Database,
        )
    })?;

    tracing::info!(department_id = department.department_id, "Department created");

    Ok(department)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str, group_name: &str) -> CreateDepartmentCommand {
        CreateDepartmentCommand {
            name: name.to_string(),
            group_name: group_name.to_string(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command("Tool Design", "Research and Development").validate().is_ok());
    }

    #[test]
    fn test_validation_empty_name() {
        assert!(matches!(
            command("  ", "Sales and Marketing").validate(),
            Err(CreateDepartmentError::Validation(FieldError::Required { field: "name" }))
        ));
    }

    #[test]
    fn test_validation_group_name_too_long() {
        let result = command("Sales", &"g".repeat(51)).validate();
        assert!(matches!(
            result,
            Err(CreateDepartmentError::Validation(FieldError::TooLong { field: "group_name", .. }))
        ));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: AppError = CreateDepartmentError::DuplicateName("Sales".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_creates_department(pool: PgPool) -> sqlx::Result<()> {
        let created = handle(pool.clone(), command("Tool Design", "Research and Development"))
            .await
            .unwrap();
        assert!(created.department_id > 0);
        assert_eq!(created.name, "Tool Design");

        let duplicate = handle(pool, command("Tool Design", "Manufacturing")).await;
        assert!(matches!(duplicate, Err(CreateDepartmentError::DuplicateName(_))));
        Ok(())
    }
}
