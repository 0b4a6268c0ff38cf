use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::departments::types::{Department, DEPARTMENT_COLUMNS};
use crate::features::shared::validation::FieldError;
use crate::features::shared::{Paginated, PaginationParams};

/// `GET /departments?page=&per_page=&group_name=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDepartmentsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Exact match on `group_name`
    pub group_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListDepartmentsError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListDepartmentsError> for AppError {
    fn from(e: ListDepartmentsError) -> Self {
        match e {
            ListDepartmentsError::Validation(e) => AppError::Validation(e.to_string()),
            ListDepartmentsError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Paginated<Department>, ListDepartmentsError>> for ListDepartmentsQuery {}

impl crate::cqrs::middleware::Query for ListDepartmentsQuery {}

impl ListDepartmentsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<(), ListDepartmentsError> {
        self.pagination().validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListDepartmentsQuery,
) -> Result<Paginated<Department>, ListDepartmentsError> {
    query.validate()?;
    let params = query.pagination();
    let group_name = query.group_name.as_deref().filter(|g| !g.trim().is_empty());

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM humanresources.department
         WHERE ($1::TEXT IS NULL OR group_name = $1)",
    )
    .bind(group_name)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, Department>(&format!(
        "SELECT {DEPARTMENT_COLUMNS} FROM humanresources.department
         WHERE ($1::TEXT IS NULL OR group_name = $1)
         ORDER BY department_id
         LIMIT $2 OFFSET $3"
    ))
    .bind(group_name)
    .bind(params.per_page())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    tracing::debug!(count = items.len(), total, "Listed departments");

    Ok(Paginated::from_items(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_rejects_bad_page() {
        let query = ListDepartmentsQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_filters_by_group(pool: PgPool) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO humanresources.department (name, group_name) VALUES
                 ('Engineering', 'Research and Development'),
                 ('Tool Design', 'Research and Development'),
                 ('Sales', 'Sales and Marketing')",
        )
        .execute(&pool)
        .await?;

        let page = handle(
            pool,
            ListDepartmentsQuery {
                group_name: Some("Research and Development".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.items[0].name, "Engineering");
        Ok(())
    }
}
