use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::addresses::types::AddressType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAddressTypesQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListAddressTypesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListAddressTypesError> for AppError {
    fn from(e: ListAddressTypesError) -> Self {
        match e {
            ListAddressTypesError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Vec<AddressType>, ListAddressTypesError>> for ListAddressTypesQuery {}

impl crate::cqrs::middleware::Query for ListAddressTypesQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: ListAddressTypesQuery,
) -> Result<Vec<AddressType>, ListAddressTypesError> {
    let types = sqlx::query_as::<_, AddressType>(
        "SELECT address_type_id, name FROM person.address_type ORDER BY address_type_id",
    )
    .fetch_all(&pool)
    .await?;
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_returns_seeded_types(pool: PgPool) -> sqlx::Result<()> {
        let types = handle(pool, ListAddressTypesQuery).await.unwrap();
        assert_eq!(types.len(), 6);
        assert_eq!(types[1].name, "Home");
        Ok(())
    }
}
