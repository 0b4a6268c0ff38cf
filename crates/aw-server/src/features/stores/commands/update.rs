use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::sales_persons::types::sales_person_exists;
use crate::features::shared::validation::FieldError;
use crate::features::stores::types::{validate_store_fields, Store, STORE_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStoreCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    pub name: String,
    pub sales_person_id: Option<i32>,
    pub demographics: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateStoreError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Store {0} not found")]
    NotFound(i32),

    #[error("Sales person {0} not found")]
    SalesPersonNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateStoreError> for AppError {
    fn from(e: UpdateStoreError) -> Self {
        match e {
            UpdateStoreError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateStoreError::NotFound(_) | UpdateStoreError::SalesPersonNotFound(_) => {
                AppError::NotFound(e.to_string())
            },
            UpdateStoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Store, UpdateStoreError>> for UpdateStoreCommand {}

impl crate::cqrs::middleware::Command for UpdateStoreCommand {}

impl UpdateStoreCommand {
    pub fn validate(&self) -> Result<(), UpdateStoreError> {
        validate_store_fields(&self.name, self.sales_person_id)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(business_entity_id = command.business_entity_id))]
pub async fn handle(pool: PgPool, command: UpdateStoreCommand) -> Result<Store, UpdateStoreError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut conn = pool.acquire().await?;

    if let Some(sales_person_id) = command.sales_person_id {
        if !sales_person_exists(&mut conn, sales_person_id).await? {
            return Err(UpdateStoreError::SalesPersonNotFound(sales_person_id));
        }
    }

    sqlx::query_as::<_, Store>(&format!(
        "UPDATE sales.store
         SET name = $2, sales_person_id = $3, demographics = $4, modified_date = NOW()
         WHERE business_entity_id = $1
         RETURNING {STORE_COLUMNS}"
    ))
    .bind(id)
    .bind(command.name.trim())
    .bind(command.sales_person_id)
    .bind(command.demographics.as_deref())
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(UpdateStoreError::NotFound(id))
}
