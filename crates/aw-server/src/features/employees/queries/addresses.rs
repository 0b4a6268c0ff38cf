use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::employees::types::{employee_exists, EmployeeAddress};
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEmployeeAddressesQuery {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum ListEmployeeAddressesError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListEmployeeAddressesError> for AppError {
    fn from(e: ListEmployeeAddressesError) -> Self {
        match e {
            ListEmployeeAddressesError::Validation(e) => AppError::Validation(e.to_string()),
            ListEmployeeAddressesError::NotFound(_) => AppError::NotFound(e.to_string()),
            ListEmployeeAddressesError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Vec<EmployeeAddress>, ListEmployeeAddressesError>>
    for ListEmployeeAddressesQuery
{
}

impl crate::cqrs::middleware::Query for ListEmployeeAddressesQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListEmployeeAddressesQuery,
) -> Result<Vec<EmployeeAddress>, ListEmployeeAddressesError> {
    let id = query.business_entity_id;
    if id <= 0 {
        return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
    }

    let mut conn = pool.acquire().await?;
    if !employee_exists(&mut conn, id).await? {
        return Err(ListEmployeeAddressesError::NotFound(id));
    }

    let addresses = sqlx::query_as::<_, EmployeeAddress>(
        "SELECT a.address_id, bea.address_type_id, t.name AS address_type,
                a.address_line1, a.address_line2, a.city, a.state_province_id, a.postal_code
         FROM person.business_entity_address bea
         JOIN person.address a ON a.address_id = bea.address_id
         JOIN person.address_type t ON t.address_type_id = bea.address_type_id
         WHERE bea.business_entity_id = $1
         ORDER BY a.address_id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(addresses)
}
