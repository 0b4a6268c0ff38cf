use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStoreCommand {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteStoreError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Store {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteStoreError> for AppError {
    fn from(e: DeleteStoreError) -> Self {
        match e {
            DeleteStoreError::Validation(e) => AppError::Validation(e.to_string()),
            DeleteStoreError::NotFound(_) => AppError::NotFound(e.to_string()),
            DeleteStoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<(), DeleteStoreError>> for DeleteStoreCommand {}

impl crate::cqrs::middleware::Command for DeleteStoreCommand {}

impl DeleteStoreCommand {
    pub fn validate(&self) -> Result<(), DeleteStoreError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

/// Removes the store, its address links and its business entity row
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, command: DeleteStoreCommand) -> Result<(), DeleteStoreError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM sales.store WHERE business_entity_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteStoreError::NotFound(id));
    }

    sqlx::query("DELETE FROM person.business_entity_address WHERE business_entity_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM person.business_entity WHERE business_entity_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Store deleted");

    Ok(())
}
