//! Partial employee update

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::features::employees::types::{
    load_employee_details, today, validate_birth_date, validate_gender, validate_marital_status,
    validate_pto, EmployeeDetails, JOB_TITLE_MAX, LOGIN_ID_MAX, NAME_MAX, SICK_LEAVE_HOURS_MAX,
    SICK_LEAVE_HOURS_MIN, SUFFIX_MAX, TITLE_MAX, VACATION_HOURS_MAX, VACATION_HOURS_MIN,
};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{
    validate_optional_text, validate_range, validate_required_text, FieldError,
};

/// Absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PatchEmployeeCommand {
    #[serde(skip)]
    pub business_entity_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salaried_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacation_hours: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sick_leave_hours: Option<i16>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatchEmployeeError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Employee {0} not found")]
    NotFound(i32),

    #[error("An employee with login id '{0}' already exists")]
    DuplicateLoginId(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PatchEmployeeError> for AppError {
    fn from(e: PatchEmployeeError) -> Self {
        match e {
            PatchEmployeeError::Validation(e) => AppError::Validation(e.to_string()),
            PatchEmployeeError::NotFound(_) => AppError::NotFound(e.to_string()),
            PatchEmployeeError::DuplicateLoginId(_) => AppError::Conflict(e.to_string()),
            PatchEmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<EmployeeDetails, PatchEmployeeError>> for PatchEmployeeCommand {}

impl crate::cqrs::middleware::Command for PatchEmployeeCommand {}

impl PatchEmployeeCommand {
    fn touches_person(&self) -> bool {
        self.title.is_some()
            || self.first_name.is_some()
            || self.middle_name.is_some()
            || self.last_name.is_some()
            || self.suffix.is_some()
    }

    fn touches_employee(&self) -> bool {
        self.login_id.is_some()
            || self.job_title.is_some()
            || self.birth_date.is_some()
            || self.marital_status.is_some()
            || self.gender.is_some()
            || self.salaried_flag.is_some()
            || self.vacation_hours.is_some()
            || self.sick_leave_hours.is_some()
    }

    pub fn validate(&self) -> Result<(), PatchEmployeeError> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), PatchEmployeeError> {
        if self.business_entity_id <= 0 {
            return Err(FieldError::invalid("business_entity_id", "must be greater than 0").into());
        }
        if !self.touches_person() && !self.touches_employee() {
            return Err(FieldError::NoFieldsToUpdate.into());
        }

        validate_optional_text(self.title.as_deref(), "title", TITLE_MAX)?;
        if let Some(ref first_name) = self.first_name {
            validate_required_text(first_name, "first_name", NAME_MAX)?;
        }
        validate_optional_text(self.middle_name.as_deref(), "middle_name", NAME_MAX)?;
        if let Some(ref last_name) = self.last_name {
            validate_required_text(last_name, "last_name", NAME_MAX)?;
        }
        validate_optional_text(self.suffix.as_deref(), "suffix", SUFFIX_MAX)?;

        if let Some(ref login_id) = self.login_id {
            validate_required_text(login_id, "login_id", LOGIN_ID_MAX)?;
        }
        if let Some(ref job_title) = self.job_title {
            validate_required_text(job_title, "job_title", JOB_TITLE_MAX)?;
        }
        if let Some(birth_date) = self.birth_date {
            validate_birth_date(birth_date, today)?;
        }
        if let Some(ref marital_status) = self.marital_status {
            validate_marital_status(marital_status)?;
        }
        if let Some(ref gender) = self.gender {
            validate_gender(gender)?;
        }
        match (self.vacation_hours, self.sick_leave_hours) {
            (Some(vacation), Some(sick)) => validate_pto(vacation, sick)?,
            (Some(vacation), None) => {
                validate_range(vacation, "vacation_hours", VACATION_HOURS_MIN, VACATION_HOURS_MAX)?
            },
            (None, Some(sick)) => validate_range(
                sick,
                "sick_leave_hours",
                SICK_LEAVE_HOURS_MIN,
                SICK_LEAVE_HOURS_MAX,
            )?,
            (None, None) => {},
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(business_entity_id = command.business_entity_id))]
pub async fn handle(
    pool: PgPool,
    command: PatchEmployeeCommand,
) -> Result<EmployeeDetails, PatchEmployeeError> {
    command.validate()?;
    let id = command.business_entity_id;

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE humanresources.employee
         SET login_id = COALESCE($2, login_id),
             job_title = COALESCE($3, job_title),
             birth_date = COALESCE($4, birth_date),
             marital_status = COALESCE($5, marital_status),
             gender = COALESCE($6, gender),
             salaried_flag = COALESCE($7, salaried_flag),
             vacation_hours = COALESCE($8, vacation_hours),
             sick_leave_hours = COALESCE($9, sick_leave_hours),
             modified_date = NOW()
         WHERE business_entity_id = $1",
    )
    .bind(id)
    .bind(command.login_id.as_deref().map(str::trim))
    .bind(command.job_title.as_deref().map(str::trim))
    .bind(command.birth_date)
    .bind(command.marital_status.as_deref())
    .bind(command.gender.as_deref())
    .bind(command.salaried_flag)
    .bind(command.vacation_hours)
    .bind(command.sick_leave_hours)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            PatchEmployeeError::DuplicateLoginId(command.login_id.clone().unwrap_or_default()),
            Into::into,
        )
    })?;

    if updated.rows_affected() == 0 {
        return Err(PatchEmployeeError::NotFound(id));
    }

    if command.touches_person() {
        sqlx::query(
            "UPDATE person.person
             SET title = COALESCE($2, title),
                 first_name = COALESCE($3, first_name),
                 middle_name = COALESCE($4, middle_name),
                 last_name = COALESCE($5, last_name),
                 suffix = COALESCE($6, suffix),
                 modified_date = NOW()
             WHERE business_entity_id = $1",
        )
        .bind(id)
        .bind(command.title.as_deref())
        .bind(command.first_name.as_deref().map(str::trim))
        .bind(command.middle_name.as_deref())
        .bind(command.last_name.as_deref().map(str::trim))
        .bind(command.suffix.as_deref())
        .execute(&mut *tx)
        .await?;
    }

    let details = load_employee_details(&mut tx, id)
        .await?
        .ok_or(PatchEmployeeError::NotFound(id))?;

    tx.commit().await?;

    tracing::info!("Employee patched");

    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        let command = PatchEmployeeCommand {
            business_entity_id: 1,
            ..Default::default()
        };
        assert!(matches!(
            command.validate_on(today()),
            Err(PatchEmployeeError::Validation(FieldError::NoFieldsToUpdate))
        ));
    }

    #[test]
    fn test_single_field_patches() {
        let command = PatchEmployeeCommand {
            business_entity_id: 1,
            job_title: Some("Design Engineer".to_string()),
            ..Default::default()
        };
        assert!(command.validate_on(today()).is_ok());
        assert!(!command.touches_person());

        let command = PatchEmployeeCommand {
            business_entity_id: 1,
            last_name: Some("Walters".to_string()),
            ..Default::default()
        };
        assert!(command.touches_person());
        assert!(command.validate_on(today()).is_ok());
    }

    #[test]
    fn test_present_fields_are_checked() {
        let bad = [
            PatchEmployeeCommand {
                gender: Some("X".into()),
                ..Default::default()
            },
            PatchEmployeeCommand {
                sick_leave_hours: Some(121),
                ..Default::default()
            },
            PatchEmployeeCommand {
                vacation_hours: Some(-41),
                ..Default::default()
            },
            PatchEmployeeCommand {
                first_name: Some(" ".into()),
                ..Default::default()
            },
        ];
        for mut command in bad {
            command.business_entity_id = 1;
            assert!(command.validate_on(today()).is_err(), "{command:?}");
        }
    }
}
