//! Hire an employee record that has never been assigned

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use super::transition::{load_state, persist, LifecycleResponse};
use crate::error::AppError;
use crate::features::employees::lifecycle::{self, Assignment, LifecycleError};
use crate::features::employees::types::{
    department_exists, shift_exists, today, validate_hire_date, validate_pay, JOB_TITLE_MAX,
};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_required_text, FieldError};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HireEmployeeCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    pub hire_date: NaiveDate,
    pub department_id: i16,
    pub shift_id: i16,
    #[schema(value_type = String)]
    pub rate: BigDecimal,
    pub pay_frequency: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum HireEmployeeError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Department {0} not found")]
    DepartmentNotFound(i16),

    #[error("Shift {0} not found")]
    ShiftNotFound(i16),

    #[error("A pay rate change is already recorded for {0}")]
    PayChangeExists(NaiveDate),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<HireEmployeeError> for AppError {
    fn from(e: HireEmployeeError) -> Self {
        match e {
            HireEmployeeError::Validation(e) => AppError::Validation(e.to_string()),
            HireEmployeeError::Lifecycle(e) => AppError::InvalidOperation(e.to_string()),
            HireEmployeeError::NotFound(_)
            | HireEmployeeError::DepartmentNotFound(_)
            | HireEmployeeError::ShiftNotFound(_) => AppError::NotFound(e.to_string()),
            HireEmployeeError::PayChangeExists(_) => AppError::Conflict(e.to_string()),
            HireEmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<LifecycleResponse, HireEmployeeError>> for HireEmployeeCommand {}

impl crate::cqrs::middleware::Command for HireEmployeeCommand {}

impl HireEmployeeCommand {
    pub fn validate(&self) -> Result<(), HireEmployeeError> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), HireEmployeeError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        validate_hire_date(self.hire_date, "hire_date", today)?;
        validate_pay(&self.rate, self.pay_frequency)?;
        if let Some(ref job_title) = self.job_title {
            validate_required_text(job_title, "job_title", JOB_TITLE_MAX)?;
        }
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(
        business_entity_id = command.business_entity_id,
        hire_date = %command.hire_date,
        department_id = command.department_id
    )
)]
pub async fn handle(
    pool: PgPool,
    command: HireEmployeeCommand,
) -> Result<LifecycleResponse, HireEmployeeError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let state = load_state(&mut tx, id)
        .await?
        .ok_or(HireEmployeeError::NotFound(id))?;
    if !department_exists(&mut tx, command.department_id).await? {
        return Err(HireEmployeeError::DepartmentNotFound(command.department_id));
    }
    if !shift_exists(&mut tx, command.shift_id).await? {
        return Err(HireEmployeeError::ShiftNotFound(command.shift_id));
    }

    let transition = lifecycle::hire(
        &state,
        command.hire_date,
        Assignment {
            department_id: command.department_id,
            shift_id: command.shift_id,
        },
        command.rate.clone(),
        command.pay_frequency,
    )?;

    persist(&mut tx, id, &transition, command.job_title.as_deref().map(str::trim))
        .await
        .map_err(|e| {
            map_unique_violation(e, HireEmployeeError::PayChangeExists(command.hire_date), Into::into)
        })?;

    tx.commit().await?;

    tracing::info!("Employee hired");

    Ok(LifecycleResponse::new(id, command.hire_date, &transition))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> HireEmployeeCommand {
        HireEmployeeCommand {
            business_entity_id: 1,
            hire_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            department_id: 1,
            shift_id: 1,
            rate: BigDecimal::from(30),
            pay_frequency: 2,
            job_title: None,
        }
    }

    #[test]
    fn test_validation() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(command().validate_on(today).is_ok());

        let mut early = command();
        early.hire_date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert!(early.validate_on(today).is_err());

        let mut underpaid = command();
        underpaid.rate = BigDecimal::from(5);
        assert!(underpaid.validate_on(today).is_err());
    }

    #[test]
    fn test_lifecycle_errors_are_invalid_operations() {
        let err: AppError = HireEmployeeError::Lifecycle(LifecycleError::AlreadyHired).into();
        assert!(matches!(err, AppError::InvalidOperation(_)));
        assert_eq!(err.code(), "INVALID_OPERATION");
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_pending_employee_hire_then_terminate(pool: PgPool) -> sqlx::Result<()> {
        use crate::features::employees::commands::{create, terminate};

        sqlx::query("INSERT INTO humanresources.department (name, group_name) VALUES ('Executive', 'Executive')")
            .execute(&pool)
            .await?;
        sqlx::query("INSERT INTO humanresources.shift (name, start_time, end_time) VALUES ('Day', '07:00', '15:00')")
            .execute(&pool)
            .await?;

        let mut json = create::tests::sample_json();
        for field in ["department_id", "shift_id", "rate", "pay_frequency"] {
            json.as_object_mut().unwrap().remove(field);
        }
        let created = create::handle(pool.clone(), serde_json::from_value(json).unwrap())
            .await
            .unwrap();
        assert!(!created.current_flag);
        assert!(created.department_name.is_none());
        let id = created.business_entity_id;

        let mut hire_command = command();
        hire_command.business_entity_id = id;
        let hired = handle(pool.clone(), hire_command.clone()).await.unwrap();
        assert!(hired.current_flag);
        assert_eq!(hired.department_id, Some(1));
        assert_eq!((hired.vacation_hours, hired.sick_leave_hours), (0, 0));

        let again = handle(pool.clone(), hire_command.clone()).await;
        assert!(matches!(again, Err(HireEmployeeError::Lifecycle(LifecycleError::AlreadyActive))));

        let terminated = terminate::handle(
            pool.clone(),
            terminate::TerminateEmployeeCommand {
                business_entity_id: id,
                termination_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
                reason: None,
            },
        )
        .await
        .unwrap();
        assert!(!terminated.current_flag);

        let after_termination = handle(pool.clone(), hire_command).await;
        assert!(matches!(
            after_termination,
            Err(HireEmployeeError::Lifecycle(LifecycleError::AlreadyHired))
        ));

        let (history, pay): (i64, i64) = sqlx::query_as(
            "SELECT
                 (SELECT COUNT(*) FROM humanresources.employee_department_history
                  WHERE business_entity_id = $1 AND end_date IS NOT NULL),
                 (SELECT COUNT(*) FROM humanresources.employee_pay_history
                  WHERE business_entity_id = $1)",
        )
        .bind(id)
        .fetch_one(&pool)
        .await?;
        assert_eq!((history, pay), (1, 1));
        Ok(())
    }
}
