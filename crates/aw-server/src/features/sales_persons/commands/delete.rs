use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSalesPersonCommand {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteSalesPersonError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Sales person {0} not found")]
    NotFound(i32),

    #[error("Sales person {0} is still assigned to stores")]
    AssignedToStores(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteSalesPersonError> for AppError {
    fn from(e: DeleteSalesPersonError) -> Self {
        match e {
            DeleteSalesPersonError::Validation(e) => AppError::Validation(e.to_string()),
            DeleteSalesPersonError::NotFound(_) => AppError::NotFound(e.to_string()),
            DeleteSalesPersonError::AssignedToStores(_) => AppError::Conflict(e.to_string()),
            DeleteSalesPersonError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<(), DeleteSalesPersonError>> for DeleteSalesPersonCommand {}

impl crate::cqrs::middleware::Command for DeleteSalesPersonCommand {}

impl DeleteSalesPersonCommand {
    pub fn validate(&self) -> Result<(), DeleteSalesPersonError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, command: DeleteSalesPersonCommand) -> Result<(), DeleteSalesPersonError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let stores: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sales.store WHERE sales_person_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    if stores > 0 {
        tracing::warn!(stores, "Refusing to delete sales person with stores");
        return Err(DeleteSalesPersonError::AssignedToStores(id));
    }

    let result = sqlx::query("DELETE FROM sales.sales_person WHERE business_entity_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteSalesPersonError::NotFound(id));
    }

    sqlx::query(
        "UPDATE person.person SET person_type = 'EM', modified_date = NOW()
         WHERE business_entity_id = $1 AND person_type = 'SP'",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Sales person deleted");

    Ok(())
}
