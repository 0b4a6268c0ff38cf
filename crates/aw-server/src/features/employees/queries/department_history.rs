use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::employees::types::{employee_exists, DepartmentHistoryEntry};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDepartmentHistoryQuery {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum GetDepartmentHistoryError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetDepartmentHistoryError> for AppError {
    fn from(e: GetDepartmentHistoryError) -> Self {
        match e {
            GetDepartmentHistoryError::Validation(e) => AppError::Validation(e.to_string()),
            GetDepartmentHistoryError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetDepartmentHistoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Vec<DepartmentHistoryEntry>, GetDepartmentHistoryError>>
    for GetDepartmentHistoryQuery
{
}

impl crate::cqrs::middleware::Query for GetDepartmentHistoryQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetDepartmentHistoryQuery,
) -> Result<Vec<DepartmentHistoryEntry>, GetDepartmentHistoryError> {
    let id = query.business_entity_id;
    if id <= 0 {
        return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
    }

    let mut conn = pool.acquire().await?;
    if !employee_exists(&mut conn, id).await? {
        return Err(GetDepartmentHistoryError::NotFound(id));
    }

    let history = sqlx::query_as::<_, DepartmentHistoryEntry>(
        "SELECT h.department_id, d.name AS department_name, h.shift_id, s.name AS shift_name,
                h.start_date, h.end_date
         FROM humanresources.employee_department_history h
         JOIN humanresources.department d ON d.department_id = h.department_id
         JOIN humanresources.shift s ON s.shift_id = h.shift_id
         WHERE h.business_entity_id = $1
         ORDER BY h.start_date",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(history)
}
