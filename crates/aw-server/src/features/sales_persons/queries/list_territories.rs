use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::sales_persons::types::SalesTerritory;

/// All sales territories, ordered by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTerritoriesQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListTerritoriesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListTerritoriesError> for AppError {
    fn from(e: ListTerritoriesError) -> Self {
        match e {
            ListTerritoriesError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Vec<SalesTerritory>, ListTerritoriesError>> for ListTerritoriesQuery {}

impl crate::cqrs::middleware::Query for ListTerritoriesQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: ListTerritoriesQuery,
) -> Result<Vec<SalesTerritory>, ListTerritoriesError> {
    let territories = sqlx::query_as::<_, SalesTerritory>(
        "SELECT territory_id, name, country_region_code, group_name, sales_ytd, sales_last_year
         FROM sales.sales_territory
         ORDER BY territory_id",
    )
    .fetch_all(&pool)
    .await?;

    Ok(territories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_territories_are_seeded(pool: PgPool) -> sqlx::Result<()> {
        let territories = handle(pool, ListTerritoriesQuery).await.unwrap();
        assert!(!territories.is_empty());
        assert!(territories.windows(2).all(|w| w[0].territory_id < w[1].territory_id));
        Ok(())
    }
}
