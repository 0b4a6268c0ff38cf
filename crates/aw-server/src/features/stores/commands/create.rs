//! Create store command
//!
//! Inserts the owning `person.business_entity` row and the store in one
//! transaction.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::sales_persons::types::sales_person_exists;
use crate::features::shared::validation::FieldError;
use crate::features::stores::types::{validate_store_fields, Store, STORE_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateStoreCommand {
    pub name: String,
    pub sales_person_id: Option<i32>,
    pub demographics: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateStoreError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Sales person {0} not found")]
    SalesPersonNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateStoreError> for AppError {
    fn from(e: CreateStoreError) -> Self {
        match e {
            CreateStoreError::Validation(e) => AppError::Validation(e.to_string()),
            CreateStoreError::SalesPersonNotFound(_) => AppError::NotFound(e.to_string()),
            CreateStoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Store, CreateStoreError>> for CreateStoreCommand {}

impl crate::cqrs::middleware::Command for CreateStoreCommand {}

impl CreateStoreCommand {
    pub fn validate(&self) -> Result<(), CreateStoreError> {
        validate_store_fields(&self.name, self.sales_person_id)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(pool: PgPool, command: CreateStoreCommand) -> Result<Store, CreateStoreError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    if let Some(sales_person_id) = command.sales_person_id {
        if !sales_person_exists(&mut tx, sales_person_id).await? {
            return Err(CreateStoreError::SalesPersonNotFound(sales_person_id));
        }
    }

    let business_entity_id: i32 = sqlx::query_scalar(
        "INSERT INTO person.business_entity (rowguid, modified_date)
         VALUES ($1, NOW())
         RETURNING business_entity_id",
    )
    .bind(Uuid::new_v4())
    .fetch_one(&mut *tx)
    .await?;

    let store = sqlx::query_as::<_, Store>(&format!(
        "INSERT INTO sales.store (business_entity_id, name, sales_person_id, demographics, rowguid, modified_date)
         VALUES ($1, $2, $3, $4, $5, NOW())
         RETURNING {STORE_COLUMNS}"
    ))
    .bind(business_entity_id)
    .bind(command.name.trim())
    .bind(command.sales_person_id)
    .bind(command.demographics.as_deref())
    .bind(Uuid::new_v4())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(business_entity_id, "Store created");

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let cmd: CreateStoreCommand =
            serde_json::from_str(r#"{"name": "Bike World", "sales_person_id": 277}"#).unwrap();
        assert!(cmd.validate().is_ok());

        let cmd: CreateStoreCommand = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(matches!(cmd.validate(), Err(CreateStoreError::Validation(_))));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_create_store_without_sales_person(pool: PgPool) -> sqlx::Result<()> {
        let store = handle(
            pool.clone(),
            CreateStoreCommand {
                name: "  Bike World ".to_string(),
                sales_person_id: None,
                demographics: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(store.name, "Bike World");

        let entities: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM person.business_entity WHERE business_entity_id = $1",
        )
        .bind(store.business_entity_id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(entities, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_unknown_sales_person_rolls_back(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(
            pool.clone(),
            CreateStoreCommand {
                name: "Bike World".to_string(),
                sales_person_id: Some(4242),
                demographics: None,
            },
        )
        .await;
        assert!(matches!(result, Err(CreateStoreError::SalesPersonNotFound(4242))));

        let stores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales.store")
            .fetch_one(&pool)
            .await?;
        assert_eq!(stores, 0);
        Ok(())
    }
}
