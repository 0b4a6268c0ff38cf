use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::addresses::types::{Address, ADDRESS_COLUMNS};
use crate::features::shared::validation::FieldError;
use crate::features::shared::{Paginated, PaginationParams};

/// `GET /addresses?city=&postal_code=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAddressesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive exact match
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListAddressesError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListAddressesError> for AppError {
    fn from(e: ListAddressesError) -> Self {
        match e {
            ListAddressesError::Validation(e) => AppError::Validation(e.to_string()),
            ListAddressesError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Paginated<Address>, ListAddressesError>> for ListAddressesQuery {}

impl crate::cqrs::middleware::Query for ListAddressesQuery {}

impl ListAddressesQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListAddressesQuery,
) -> Result<Paginated<Address>, ListAddressesError> {
    let params = query.pagination();
    params.validate()?;
    let city = non_blank(&query.city);
    let postal_code = non_blank(&query.postal_code);

    let filter = "WHERE ($1::TEXT IS NULL OR LOWER(city) = LOWER($1))
                    AND ($2::TEXT IS NULL OR postal_code = $2)";

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM person.address {filter}"))
        .bind(city)
        .bind(postal_code)
        .fetch_one(&pool)
        .await?;

    let items = sqlx::query_as::<_, Address>(&format!(
        "SELECT {ADDRESS_COLUMNS} FROM person.address {filter}
         ORDER BY address_id
         LIMIT $3 OFFSET $4"
    ))
    .bind(city)
    .bind(postal_code)
    .bind(params.per_page())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Paginated::from_items(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_ignored() {
        assert_eq!(non_blank(&Some("  ".to_string())), None);
        assert_eq!(non_blank(&Some(" Bothell ".to_string())), Some("Bothell"));
        assert_eq!(non_blank(&None), None);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_filters_by_city(pool: PgPool) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO person.address (address_line1, city, state_province_id, postal_code, rowguid)
             VALUES ('1970 Napa Ct.', 'Bothell', 1, '98011', gen_random_uuid()),
                    ('9833 Mt. Dias Blv.', 'Bothell', 1, '98011', gen_random_uuid()),
                    ('250 Race Court', 'Portland', 2, '97205', gen_random_uuid())",
        )
        .execute(&pool)
        .await?;

        let page = handle(
            pool,
            ListAddressesQuery {
                city: Some("bothell".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total, 2);
        Ok(())
    }
}
