//! Replace an employee's editable fields
//!
//! `current_flag` and `hire_date` only change through the lifecycle commands.

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::employees::types::{
    load_employee_details, today, validate_birth_date, validate_gender, validate_marital_status,
    validate_pto, EmployeeDetails, PersonName, JOB_TITLE_MAX, LOGIN_ID_MAX,
};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_required_text, FieldError};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEmployeeCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    #[serde(flatten)]
    pub name: PersonName,
    pub login_id: String,
    pub job_title: String,
    pub birth_date: NaiveDate,
    pub marital_status: String,
    pub gender: String,
    pub salaried_flag: bool,
    pub vacation_hours: i16,
    pub sick_leave_hours: i16,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateEmployeeError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("An employee with login id '{0}' already exists")]
    DuplicateLoginId(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UpdateEmployeeError> for AppError {
    fn from(e: UpdateEmployeeError) -> Self {
        match e {
            UpdateEmployeeError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateEmployeeError::NotFound(_) => AppError::NotFound(e.to_string()),
            UpdateEmployeeError::DuplicateLoginId(_) => AppError::Conflict(e.to_string()),
            UpdateEmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<EmployeeDetails, UpdateEmployeeError>> for UpdateEmployeeCommand {}

impl crate::cqrs::middleware::Command for UpdateEmployeeCommand {}

impl UpdateEmployeeCommand {
    pub fn validate(&self) -> Result<(), UpdateEmployeeError> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), UpdateEmployeeError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        self.name.validate()?;
        validate_required_text(&self.login_id, "login_id", LOGIN_ID_MAX)?;
        validate_required_text(&self.job_title, "job_title", JOB_TITLE_MAX)?;
        validate_birth_date(self.birth_date, today)?;
        validate_marital_status(&self.marital_status)?;
        validate_gender(&self.gender)?;
        validate_pto(self.vacation_hours, self.sick_leave_hours)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(business_entity_id = command.business_entity_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateEmployeeCommand,
) -> Result<EmployeeDetails, UpdateEmployeeError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE humanresources.employee
         SET login_id = $2, job_title = $3, birth_date = $4, marital_status = $5, gender = $6,
             salaried_flag = $7, vacation_hours = $8, sick_leave_hours = $9, modified_date = NOW()
         WHERE business_entity_id = $1",
    )
    .bind(id)
    .bind(command.login_id.trim())
    .bind(command.job_title.trim())
    .bind(command.birth_date)
    .bind(&command.marital_status)
    .bind(&command.gender)
    .bind(command.salaried_flag)
    .bind(command.vacation_hours)
    .bind(command.sick_leave_hours)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            UpdateEmployeeError::DuplicateLoginId(command.login_id.clone()),
            Into::into,
        )
    })?;

    if updated.rows_affected() == 0 {
        return Err(UpdateEmployeeError::NotFound(id));
    }

    let name = &command.name;
    sqlx::query(
        "UPDATE person.person
         SET title = $2, first_name = $3, middle_name = $4, last_name = $5, suffix = $6,
             modified_date = NOW()
         WHERE business_entity_id = $1",
    )
    .bind(id)
    .bind(name.title.as_deref())
    .bind(name.first_name.trim())
    .bind(name.middle_name.as_deref())
    .bind(name.last_name.trim())
    .bind(name.suffix.as_deref())
    .execute(&mut *tx)
    .await?;

    let details = load_employee_details(&mut tx, id)
        .await?
        .ok_or(UpdateEmployeeError::NotFound(id))?;

    tx.commit().await?;

    tracing::info!("Employee updated");

    Ok(details)
}
