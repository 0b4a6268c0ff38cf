use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::employees::types::{load_employee_details, EmployeeDetails};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEmployeeQuery {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum GetEmployeeError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetEmployeeError> for AppError {
    fn from(e: GetEmployeeError) -> Self {
        match e {
            GetEmployeeError::Validation(e) => AppError::Validation(e.to_string()),
            GetEmployeeError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetEmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<EmployeeDetails, GetEmployeeError>> for GetEmployeeQuery {}

impl crate::cqrs::middleware::Query for GetEmployeeQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetEmployeeQuery) -> Result<EmployeeDetails, GetEmployeeError> {
    if query.business_entity_id <= 0 {
        return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
    }

    let mut conn = pool.acquire().await?;
    load_employee_details(&mut conn, query.business_entity_id)
        .await?
        .ok_or(GetEmployeeError::NotFound(query.business_entity_id))
}
