use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::validation::FieldError;
use crate::features::shared::{Paginated, PaginationParams};
use crate::features::shifts::types::{Shift, SHIFT_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListShiftsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListShiftsError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListShiftsError> for AppError {
    fn from(e: ListShiftsError) -> Self {
        match e {
            ListShiftsError::Validation(e) => AppError::Validation(e.to_string()),
            ListShiftsError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Paginated<Shift>, ListShiftsError>> for ListShiftsQuery {}

impl crate::cqrs::middleware::Query for ListShiftsQuery {}

impl ListShiftsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListShiftsQuery) -> Result<Paginated<Shift>, ListShiftsError> {
    let params = query.pagination();
    params.validate()?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM humanresources.shift")
        .fetch_one(&pool)
        .await?;

    let items = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM humanresources.shift
         ORDER BY shift_id
         LIMIT $1 OFFSET $2"
    ))
    .bind(params.per_page())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Paginated::from_items(items, &params, total))
}
