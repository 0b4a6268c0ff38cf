use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::employees::types::{employee_exists, PayHistoryEntry};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPayHistoryQuery {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPayHistoryError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetPayHistoryError> for AppError {
    fn from(e: GetPayHistoryError) -> Self {
        match e {
            GetPayHistoryError::Validation(e) => AppError::Validation(e.to_string()),
            GetPayHistoryError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetPayHistoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Vec<PayHistoryEntry>, GetPayHistoryError>> for GetPayHistoryQuery {}

impl crate::cqrs::middleware::Query for GetPayHistoryQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetPayHistoryQuery,
) -> Result<Vec<PayHistoryEntry>, GetPayHistoryError> {
    let id = query.business_entity_id;
    if id <= 0 {
        return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
    }

    let mut conn = pool.acquire().await?;
    if !employee_exists(&mut conn, id).await? {
        return Err(GetPayHistoryError::NotFound(id));
    }

    let history = sqlx::query_as::<_, PayHistoryEntry>(
        "SELECT rate_change_date, rate, pay_frequency, modified_date
         FROM humanresources.employee_pay_history
         WHERE business_entity_id = $1
         ORDER BY rate_change_date",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(history)
}
