use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::departments::types::{Department, DEPARTMENT_COLUMNS};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDepartmentQuery {
    pub department_id: i16,
}

#[derive(Debug, thiserror::Error)]
pub enum GetDepartmentError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Department {0} not found")]
    NotFound(i16),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetDepartmentError> for AppError {
    fn from(e: GetDepartmentError) -> Self {
        match e {
            GetDepartmentError::Validation(e) => AppError::Validation(e.to_string()),
            GetDepartmentError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetDepartmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Department, GetDepartmentError>> for GetDepartmentQuery {}

impl crate::cqrs::middleware::Query for GetDepartmentQuery {}

impl GetDepartmentQuery {
    pub fn validate(&self) -> Result<(), GetDepartmentError> {
        if self.department_id <= 0 {
            return Err(FieldError::invalid("department_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetDepartmentQuery) -> Result<Department, GetDepartmentError> {
    query.validate()?;

    sqlx::query_as::<_, Department>(&format!(
        "SELECT {DEPARTMENT_COLUMNS} FROM humanresources.department WHERE department_id = $1"
    ))
    .bind(query.department_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetDepartmentError::NotFound(query.department_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(GetDepartmentQuery { department_id: 1 }.validate().is_ok());
        assert!(GetDepartmentQuery { department_id: 0 }.validate().is_err());
        assert!(GetDepartmentQuery { department_id: -4 }.validate().is_err());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: AppError = GetDepartmentError::NotFound(12).into();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Department 12 not found");
    }
}
