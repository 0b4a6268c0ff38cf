//! Partial department update

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::departments::types::{Department, DEPARTMENT_COLUMNS, DEPARTMENT_NAME_MAX};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_required_text, FieldError};

/// Only the fields present in the body are changed
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PatchDepartmentCommand {
    #[serde(skip)]
    pub department_id: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatchDepartmentError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Department {0} not found")]
    NotFound(i16),

    #[error("Department '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PatchDepartmentError> for AppError {
    fn from(e: PatchDepartmentError) -> Self {
        match e {
            PatchDepartmentError::Validation(e) => AppError::Validation(e.to_string()),
            PatchDepartmentError::NotFound(_) => AppError::NotFound(e.to_string()),
            PatchDepartmentError::DuplicateName(_) => AppError::Conflict(e.to_string()),
            PatchDepartmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Department, PatchDepartmentError>> for PatchDepartmentCommand {}

impl crate::cqrs::middleware::Command for PatchDepartmentCommand {}

impl PatchDepartmentCommand {
    pub fn validate(&self) -> Result<(), PatchDepartmentError> {
        if self.department_id <= 0 {
            return Err(FieldError::invalid("department_id", "must be greater than 0").into());
        }
        if self.name.is_none() && self.group_name.is_none() {
            return Err(FieldError::NoFieldsToUpdate.into());
        }
        if let Some(ref name) = self.name {
            validate_required_text(name, "name", DEPARTMENT_NAME_MAX)?;
        }
        if let Some(ref group_name) = self.group_name {
            validate_required_text(group_name, "group_name", DEPARTMENT_NAME_MAX)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(department_id = command.department_id))]
pub async fn handle(
    pool: PgPool,
    command: PatchDepartmentCommand,
) -> Result<Department, PatchDepartmentError> {
    command.validate()?;

    let department = sqlx::query_as::<_, Department>(&format!(
        "UPDATE humanresources.department
         SET name = COALESCE($2, name),
             group_name = COALESCE($3, group_name),
             modified_date = NOW()
         WHERE department_id = $1
         RETURNING {DEPARTMENT_COLUMNS}"
    ))
    .bind(command.department_id)
    .bind(command.name.as_deref().map(str::trim))
    .bind(command.group_name.as_deref().map(str::trim))
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            PatchDepartmentError::DuplicateName(command.name.clone().unwrap_or_default()),
            PatchDepartmentError::Database,
        )
    })?
    .ok_or(PatchDepartmentError::NotFound(command.department_id))?;

    tracing::info!("Department patched");

    Ok(department)
}
