//! Rehire a former employee

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
pub struct RehireEmployeeCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    pub rehire_date: NaiveDate,
    pub department_id: i16,
    pub shift_id: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// New pay rate, recorded from `rehire_date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub rate: Option<BigDecimal>,
    /// Required with `rate`; defaults to the last recorded frequency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_frequency: Option<i16>,
}

#[derive(Debug, thiserror::Error)]
pub enum RehireEmployeeError {
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

impl From<RehireEmployeeError> for AppError {
    fn from(e: RehireEmployeeError) -> Self {
        match e {
            RehireEmployeeError::Validation(e) => AppError::Validation(e.to_string()),
            RehireEmployeeError::Lifecycle(e) => AppError::InvalidOperation(e.to_string()),
            RehireEmployeeError::NotFound(_)
            | RehireEmployeeError::DepartmentNotFound(_)
            | RehireEmployeeError::ShiftNotFound(_) => AppError::NotFound(e.to_string()),
            RehireEmployeeError::PayChangeExists(_) => AppError::Conflict(e.to_string()),
            RehireEmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<LifecycleResponse, RehireEmployeeError>> for RehireEmployeeCommand {}

impl crate::cqrs::middleware::Command for RehireEmployeeCommand {}

impl RehireEmployeeCommand {
    pub fn validate(&self) -> Result<(), RehireEmployeeError> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), RehireEmployeeError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        validate_hire_date(self.rehire_date, "rehire_date", today)?;
        if let Some(ref job_title) = self.job_title {
            validate_required_text(job_title, "job_title", JOB_TITLE_MAX)?;
        }
        match (&self.rate, self.pay_frequency) {
            (Some(rate), frequency) => validate_pay(rate, frequency.unwrap_or(1))?,
            (None, Some(_)) => {
                return Err(FieldError::invalid("pay_frequency", "requires rate").into());
            },
            (None, None) => {},
        }
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(
        business_entity_id = command.business_entity_id,
        rehire_date = %command.rehire_date,
        department_id = command.department_id
    )
)]
pub async fn handle(
    pool: PgPool,
    command: RehireEmployeeCommand,
) -> Result<LifecycleResponse, RehireEmployeeError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let state = load_state(&mut tx, id)
        .await?
        .ok_or(RehireEmployeeError::NotFound(id))?;
    if !department_exists(&mut tx, command.department_id).await? {
        return Err(RehireEmployeeError::DepartmentNotFound(command.department_id));
    }
    if !shift_exists(&mut tx, command.shift_id).await? {
        return Err(RehireEmployeeError::ShiftNotFound(command.shift_id));
    }

    let pay = match command.rate {
        Some(ref rate) => {
            let frequency = match command.pay_frequency {
                Some(frequency) => frequency,
                None => sqlx::query_scalar::<_, i16>(
                    "SELECT pay_frequency FROM humanresources.employee_pay_history
                     WHERE business_entity_id = $1
                     ORDER BY rate_change_date DESC LIMIT 1",
                )
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .unwrap_or(1),
            };
            Some((rate.clone(), frequency))
        },
        None => None,
    };

    let transition = lifecycle::rehire(
        &state,
        command.rehire_date,
        Assignment {
            department_id: command.department_id,
            shift_id: command.shift_id,
        },
        pay,
    )?;

    persist(&mut tx, id, &transition, command.job_title.as_deref().map(str::trim))
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                RehireEmployeeError::PayChangeExists(command.rehire_date),
                Into::into,
            )
        })?;

    tx.commit().await?;

    tracing::info!("Employee rehired");

    Ok(LifecycleResponse::new(id, command.rehire_date, &transition))
}
