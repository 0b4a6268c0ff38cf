use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::sales_persons::types::{load_sales_person, SalesPerson};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSalesPersonQuery {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum GetSalesPersonError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Sales person {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetSalesPersonError> for AppError {
    fn from(e: GetSalesPersonError) -> Self {
        match e {
            GetSalesPersonError::Validation(e) => AppError::Validation(e.to_string()),
            GetSalesPersonError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetSalesPersonError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<SalesPerson, GetSalesPersonError>> for GetSalesPersonQuery {}

impl crate::cqrs::middleware::Query for GetSalesPersonQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetSalesPersonQuery) -> Result<SalesPerson, GetSalesPersonError> {
    if query.business_entity_id <= 0 {
        return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
    }

    let mut conn = pool.acquire().await?;
    load_sales_person(&mut conn, query.business_entity_id)
        .await?
        .ok_or(GetSalesPersonError::NotFound(query.business_entity_id))
}
