use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::addresses::types::StateProvince;

/// `GET /state-provinces?country_region_code=US`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStateProvincesQuery {
    pub country_region_code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListStateProvincesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListStateProvincesError> for AppError {
    fn from(e: ListStateProvincesError) -> Self {
        match e {
            ListStateProvincesError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Vec<StateProvince>, ListStateProvincesError>> for ListStateProvincesQuery {}

impl crate::cqrs::middleware::Query for ListStateProvincesQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListStateProvincesQuery,
) -> Result<Vec<StateProvince>, ListStateProvincesError> {
    let country = query
        .country_region_code
        .as_deref()
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty());

    let provinces = sqlx::query_as::<_, StateProvince>(
        "SELECT state_province_id, TRIM(state_province_code) AS state_province_code,
                country_region_code, is_only_state_province_flag, name, territory_id
         FROM person.state_province
         WHERE ($1::TEXT IS NULL OR country_region_code = $1)
         ORDER BY country_region_code, name",
    )
    .bind(country)
    .fetch_all(&pool)
    .await?;

    Ok(provinces)
}
