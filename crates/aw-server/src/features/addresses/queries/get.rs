use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::addresses::types::{Address, ADDRESS_COLUMNS};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAddressQuery {
    pub address_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum GetAddressError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Address {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<GetAddressError> for AppError {
    fn from(e: GetAddressError) -> Self {
        match e {
            GetAddressError::Validation(e) => AppError::Validation(e.to_string()),
            GetAddressError::NotFound(_) => AppError::NotFound(e.to_string()),
            GetAddressError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Address, GetAddressError>> for GetAddressQuery {}

impl crate::cqrs::middleware::Query for GetAddressQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetAddressQuery) -> Result<Address, GetAddressError> {
    if query.address_id <= 0 {
        return Err(FieldError::invalid("address_id", "must be greater than 0").into());
    }

    sqlx::query_as::<_, Address>(&format!(
        "SELECT {ADDRESS_COLUMNS} FROM person.address WHERE address_id = $1"
    ))
    .bind(query.address_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetAddressError::NotFound(query.address_id))
}
