use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::sales_persons::types::SalesPerson;
use crate::features::shared::validation::FieldError;
use crate::features::shared::{Paginated, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSalesPersonsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub territory_id: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListSalesPersonsError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListSalesPersonsError> for AppError {
    fn from(e: ListSalesPersonsError) -> Self {
        match e {
            ListSalesPersonsError::Validation(e) => AppError::Validation(e.to_string()),
            ListSalesPersonsError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Paginated<SalesPerson>, ListSalesPersonsError>> for ListSalesPersonsQuery {}

impl crate::cqrs::middleware::Query for ListSalesPersonsQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListSalesPersonsQuery,
) -> Result<Paginated<SalesPerson>, ListSalesPersonsError> {
    let params = PaginationParams::new(query.page, query.per_page);
    params.validate()?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sales.sales_person WHERE ($1::INTEGER IS NULL OR territory_id = $1)",
    )
    .bind(query.territory_id)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, SalesPerson>(
        "SELECT sp.business_entity_id, p.first_name, p.last_name, e.job_title,
                sp.territory_id, t.name AS territory_name, sp.sales_quota, sp.bonus,
                sp.commission_pct, sp.sales_ytd, sp.sales_last_year, sp.modified_date
         FROM sales.sales_person sp
         JOIN humanresources.employee e ON e.business_entity_id = sp.business_entity_id
         JOIN person.person p ON p.business_entity_id = sp.business_entity_id
         LEFT JOIN sales.sales_territory t ON t.territory_id = sp.territory_id
         WHERE ($1::INTEGER IS NULL OR sp.territory_id = $1)
         ORDER BY sp.business_entity_id
         LIMIT $2 OFFSET $3",
    )
    .bind(query.territory_id)
    .bind(params.per_page())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Paginated::from_items(items, &params, total))
}
