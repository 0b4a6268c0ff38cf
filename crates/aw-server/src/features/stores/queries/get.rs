use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::validation::FieldError;
use crate::features::stores::types::{Store, STORE_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStoreQuery {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum GetStoreError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Store {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetStoreError> for AppError {
    fn from(e: GetStoreError) -> Self {
        match e {
            GetStoreError::Validation(e) => AppError::Validation(e.to_string()),
            GetStoreError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetStoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Store, GetStoreError>> for GetStoreQuery {}

impl crate::cqrs::middleware::Query for GetStoreQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetStoreQuery) -> Result<Store, GetStoreError> {
    let id = query.business_entity_id;
    if id <= 0 {
        return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
    }

    sqlx::query_as::<_, Store>(&format!(
        "SELECT {STORE_COLUMNS} FROM sales.store WHERE business_entity_id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetStoreError::NotFound(id))
}
