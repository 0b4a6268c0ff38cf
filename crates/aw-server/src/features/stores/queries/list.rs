use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::validation::FieldError;
use crate::features::shared::{Paginated, PaginationParams};
use crate::features::stores::types::{Store, STORE_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStoresQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sales_person_id: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListStoresError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListStoresError> for AppError {
    fn from(e: ListStoresError) -> Self {
        match e {
            ListStoresError::Validation(e) => AppError::Validation(e.to_string()),
            ListStoresError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Paginated<Store>, ListStoresError>> for ListStoresQuery {}

impl crate::cqrs::middleware::Query for ListStoresQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListStoresQuery) -> Result<Paginated<Store>, ListStoresError> {
    let params = PaginationParams::new(query.page, query.per_page);
    params.validate()?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sales.store WHERE ($1::INTEGER IS NULL OR sales_person_id = $1)",
    )
    .bind(query.sales_person_id)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, Store>(&format!(
        "SELECT {STORE_COLUMNS} FROM sales.store
         WHERE ($1::INTEGER IS NULL OR sales_person_id = $1)
         ORDER BY name, business_entity_id
         LIMIT $2 OFFSET $3"
    ))
    .bind(query.sales_person_id)
    .bind(params.per_page())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Paginated::from_items(items, &params, total))
}
