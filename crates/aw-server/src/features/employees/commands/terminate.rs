//! End an employee's employment

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use super::transition::{load_state, persist, LifecycleResponse};
use crate::error::AppError;
use crate::features::employees::lifecycle::{self, LifecycleError};
use crate::features::shared::validation::{validate_optional_text, FieldError};

pub const REASON_MAX: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TerminateEmployeeCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    pub termination_date: NaiveDate,
    /// Free text, echoed in the response and logged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TerminateEmployeeError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<TerminateEmployeeError> for AppError {
    fn from(e: TerminateEmployeeError) -> Self {
        match e {
            TerminateEmployeeError::Validation(e) => AppError::Validation(e.to_string()),
            TerminateEmployeeError::Lifecycle(e) => AppError::InvalidOperation(e.to_string()),
            TerminateEmployeeError::NotFound(_) => AppError::NotFound(e.to_string()),
            TerminateEmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<LifecycleResponse, TerminateEmployeeError>> for TerminateEmployeeCommand {}

impl crate::cqrs::middleware::Command for TerminateEmployeeCommand {}

impl TerminateEmployeeCommand {
    pub fn validate(&self) -> Result<(), TerminateEmployeeError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        validate_optional_text(self.reason.as_deref(), "reason", REASON_MAX)?;
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(
        business_entity_id = command.business_entity_id,
        termination_date = %command.termination_date
    )
)]
pub async fn handle(
    pool: PgPool,
    command: TerminateEmployeeCommand,
) -> Result<LifecycleResponse, TerminateEmployeeError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let state = load_state(&mut tx, id)
        .await?
        .ok_or(TerminateEmployeeError::NotFound(id))?;

    let transition = lifecycle::terminate(&state, command.termination_date)?;
    persist(&mut tx, id, &transition, None).await?;

    tx.commit().await?;

    tracing::info!(
        pto_hours_paid_out = transition.pto_hours_paid_out,
        reason = command.reason.as_deref().unwrap_or(""),
        "Employee terminated"
    );

    let mut response = LifecycleResponse::new(id, command.termination_date, &transition);
    response.reason = command.reason;
    Ok(response)
}
