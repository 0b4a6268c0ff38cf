use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::shared::error_helpers::map_foreign_key_violation;
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAddressCommand {
    pub address_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAddressError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Address {0} not found")]
    NotFound(i32),

    #[error("Address {0} is still linked to a business entity")]
    InUse(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteAddressError> for AppError {
    fn from(e: DeleteAddressError) -> Self {
        match e {
            DeleteAddressError::Validation(e) => AppError::Validation(e.to_string()),
            DeleteAddressError::NotFound(_) => AppError::NotFound(e.to_string()),
            DeleteAddressError::InUse(_) => AppError::Conflict(e.to_string()),
            DeleteAddressError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<(), DeleteAddressError>> for DeleteAddressCommand {}

impl crate::cqrs::middleware::Command for DeleteAddressCommand {}

impl DeleteAddressCommand {
    pub fn validate(&self) -> Result<(), DeleteAddressError> {
        if self.address_id <= 0 {
            return Err(FieldError::invalid("address_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, command: DeleteAddressCommand) -> Result<(), DeleteAddressError> {
    command.validate()?;
    let id = command.address_id;

    let linked: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM person.business_entity_address WHERE address_id = $1)",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?;

    if linked {
        return Err(DeleteAddressError::InUse(id));
    }

    let result = sqlx::query("DELETE FROM person.address WHERE address_id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, DeleteAddressError::InUse(id), Into::into))?;

    if result.rows_affected() == 0 {
        return Err(DeleteAddressError::NotFound(id));
    }

    tracing::info!("Address deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_linked_address_conflicts(pool: PgPool) -> sqlx::Result<()> {
        let entity_id: i32 = sqlx::query_scalar(
            "INSERT INTO person.business_entity (rowguid) VALUES (gen_random_uuid())
             RETURNING business_entity_id",
        )
        .fetch_one(&pool)
        .await?;
        let address_id: i32 = sqlx::query_scalar(
            "INSERT INTO person.address (address_line1, city, state_province_id, postal_code, rowguid)
             VALUES ('1 Main St', 'Seattle', 1, '98104', gen_random_uuid())
             RETURNING address_id",
        )
        .fetch_one(&pool)
        .await?;
        sqlx::query(
            "INSERT INTO person.business_entity_address
                 (business_entity_id, address_id, address_type_id, rowguid)
             VALUES ($1, $2, 2, gen_random_uuid())",
        )
        .bind(entity_id)
        .bind(address_id)
        .execute(&pool)
        .await?;

        let result = handle(pool, DeleteAddressCommand { address_id }).await;
        assert!(matches!(result, Err(DeleteAddressError::InUse(_))));
        Ok(())
    }
}
