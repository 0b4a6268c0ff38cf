use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::employees::types::EmployeeSummary;
use crate::features::shared::validation::FieldError;
use crate::features::shared::{Paginated, PaginationParams};

/// `GET /employees?current_flag=&job_title_contains=&department_id=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEmployeesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub current_flag: Option<bool>,
    /// Case-insensitive substring of `job_title`
    pub job_title_contains: Option<String>,
    /// Department of the open assignment
    pub department_id: Option<i16>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListEmployeesError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListEmployeesError> for AppError {
    fn from(e: ListEmployeesError) -> Self {
        match e {
            ListEmployeesError::Validation(e) => AppError::Validation(e.to_string()),
            ListEmployeesError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<Paginated<EmployeeSummary>, ListEmployeesError>> for ListEmployeesQuery {}

impl crate::cqrs::middleware::Query for ListEmployeesQuery {}

impl ListEmployeesQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

const FROM_EMPLOYEES: &str = "
    FROM humanresources.employee e
    JOIN person.person p ON p.business_entity_id = e.business_entity_id
    LEFT JOIN LATERAL (
        SELECT department_id FROM humanresources.employee_department_history
        WHERE business_entity_id = e.business_entity_id AND end_date IS NULL
        ORDER BY start_date DESC LIMIT 1
    ) h ON TRUE
    LEFT JOIN humanresources.department d ON d.department_id = h.department_id
    WHERE ($1::BOOLEAN IS NULL OR e.current_flag = $1)
      AND ($2::TEXT IS NULL OR POSITION(LOWER($2) IN LOWER(e.job_title)) > 0)
      AND ($3::SMALLINT IS NULL OR h.department_id = $3)";

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListEmployeesQuery,
) -> Result<Paginated<EmployeeSummary>, ListEmployeesError> {
    let params = query.pagination();
    params.validate()?;
    let job_title = query
        .job_title_contains
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {FROM_EMPLOYEES}"))
        .bind(query.current_flag)
        .bind(job_title)
        .bind(query.department_id)
        .fetch_one(&pool)
        .await?;

    let items = sqlx::query_as::<_, EmployeeSummary>(&format!(
        "SELECT e.business_entity_id, p.first_name, p.last_name, e.login_id, e.job_title,
                e.hire_date, e.current_flag, h.department_id, d.name AS department_name
         {FROM_EMPLOYEES}
         ORDER BY e.business_entity_id
         LIMIT $4 OFFSET $5"
    ))
    .bind(query.current_flag)
    .bind(job_title)
    .bind(query.department_id)
    .bind(params.per_page())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    tracing::debug!(count = items.len(), total, "Listed employees");

    Ok(Paginated::from_items(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_parsing() {
        let query: ListEmployeesQuery =
            parse_query("current_flag=true&job_title_contains=engineer&department_id=1");
        assert_eq!(query.current_flag, Some(true));
        assert_eq!(query.job_title_contains.as_deref(), Some("engineer"));
        assert_eq!(query.department_id, Some(1));
    }

    fn parse_query(raw: &str) -> ListEmployeesQuery {
        let uri: axum::http::Uri = format!("/employees?{raw}").parse().unwrap();
        axum::extract::Query::<ListEmployeesQuery>::try_from_uri(&uri)
            .unwrap()
            .0
    }
}
