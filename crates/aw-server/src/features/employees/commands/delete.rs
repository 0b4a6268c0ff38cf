//! Remove an employee, keeping the underlying person record

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::features::employees::types::employee_exists;
use crate::features::shared::validation::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEmployeeCommand {
    pub business_entity_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteEmployeeError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Employee {0} is the sales person for {1} store(s)")]
    AssignedToStores(i32, i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DeleteEmployeeError> for AppError {
    fn from(e: DeleteEmployeeError) -> Self {
        match e {
            DeleteEmployeeError::Validation(e) => AppError::Validation(e.to_string()),
            DeleteEmployeeError::NotFound(_) => AppError::NotFound(e.to_string()),
            DeleteEmployeeError::AssignedToStores(..) => AppError::Conflict(e.to_string()),
            DeleteEmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<(), DeleteEmployeeError>> for DeleteEmployeeCommand {}

impl crate::cqrs::middleware::Command for DeleteEmployeeCommand {}

impl DeleteEmployeeCommand {
    pub fn validate(&self) -> Result<(), DeleteEmployeeError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, command: DeleteEmployeeCommand) -> Result<(), DeleteEmployeeError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    if !employee_exists(&mut tx, id).await? {
        return Err(DeleteEmployeeError::NotFound(id));
    }

    let stores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales.store WHERE sales_person_id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if stores > 0 {
        return Err(DeleteEmployeeError::AssignedToStores(id, stores));
    }

    for statement in [
        "DELETE FROM humanresources.employee_department_history WHERE business_entity_id = $1",
        "DELETE FROM humanresources.employee_pay_history WHERE business_entity_id = $1",
        "DELETE FROM sales.sales_person WHERE business_entity_id = $1",
        "DELETE FROM humanresources.employee WHERE business_entity_id = $1",
    ] {
        sqlx::query(statement).bind(id).execute(&mut *tx).await?;
    }

    // A former sales person is no longer typed 'SP'
    sqlx::query(
        "UPDATE person.person SET person_type = 'EM', modified_date = NOW()
         WHERE business_entity_id = $1 AND person_type = 'SP'",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Employee deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::employees::commands::create::{self, tests::sample_json};

    #[test]
    fn test_store_assignment_is_a_conflict() {
        let err: AppError = DeleteEmployeeError::AssignedToStores(275, 2).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_keeps_person(pool: PgPool) -> sqlx::Result<()> {
        sqlx::query("INSERT INTO humanresources.department (name, group_name) VALUES ('Executive', 'Executive')")
            .execute(&pool)
            .await?;
        sqlx::query("INSERT INTO humanresources.shift (name, start_time, end_time) VALUES ('Day', '07:00', '15:00')")
            .execute(&pool)
            .await?;
        let created = create::handle(pool.clone(), serde_json::from_value(sample_json()).unwrap())
            .await
            .unwrap();
        let id = created.business_entity_id;

        handle(pool.clone(), DeleteEmployeeCommand { business_entity_id: id })
            .await
            .unwrap();

        let employees: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM humanresources.employee WHERE business_entity_id = $1")
                .bind(id)
                .fetch_one(&pool)
                .await?;
        let persons: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM person.person WHERE business_entity_id = $1")
                .bind(id)
                .fetch_one(&pool)
                .await?;
        assert_eq!((employees, persons), (0, 1));

        let again = handle(pool, DeleteEmployeeCommand { business_entity_id: id }).await;
        assert!(matches!(again, Err(DeleteEmployeeError::NotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_handle_resets_sales_person_type(pool: PgPool) -> sqlx::Result<()> {
        use crate::features::sales_persons::commands::create::{self as promote, CreateSalesPersonCommand};
        use bigdecimal::BigDecimal;

        sqlx::query("INSERT INTO humanresources.department (name, group_name) VALUES ('Sales', 'Sales and Marketing')")
            .execute(&pool)
            .await?;
        sqlx::query("INSERT INTO humanresources.shift (name, start_time, end_time) VALUES ('Day', '07:00', '15:00')")
            .execute(&pool)
            .await?;
        let created = create::handle(pool.clone(), serde_json::from_value(sample_json()).unwrap())
            .await
            .unwrap();
        let id = created.business_entity_id;

        promote::handle(
            pool.clone(),
            CreateSalesPersonCommand {
                business_entity_id: id,
                territory_id: None,
                sales_quota: None,
                bonus: BigDecimal::from(0),
                commission_pct: BigDecimal::from(0),
            },
        )
        .await
        .unwrap();

        handle(pool.clone(), DeleteEmployeeCommand { business_entity_id: id })
            .await
            .unwrap();

        let person_type: String =
            sqlx::query_scalar("SELECT person_type FROM person.person WHERE business_entity_id = $1")
                .bind(id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(person_type, "EM");
        Ok(())
    }
}
