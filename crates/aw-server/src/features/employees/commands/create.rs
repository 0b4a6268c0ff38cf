//! Create an employee together with everything it depends on
//!
//! One transaction inserts the business entity, the `EM` person, the employee
//! row, optional email, phone and address, the opening department history
//! row and the first pay rate. Any failure rolls all of it back.
//!
//! Without `department_id`, `shift_id` and `rate` the employee is created
//! pending: `current_flag` is false and no history or pay rows exist until
//! `POST /employees/{id}/hire`.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::addresses::types::{
    address_type_exists, insert_address, link_address, state_province_exists, AddressInput,
};
use crate::features::employees::types::{
    department_exists, insert_pay_history, load_employee_details, shift_exists, today,
    validate_birth_date, validate_gender, validate_hire_date, validate_marital_status,
    validate_pay, validate_pto, EmployeeDetails, PersonName, DEFAULT_PHONE_NUMBER_TYPE_ID,
    JOB_TITLE_MAX, LOGIN_ID_MAX, NATIONAL_ID_MAX,
};
use crate::features::shared::error_helpers::is_unique_violation;
use crate::features::shared::validation::{
    validate_email, validate_phone, validate_range, validate_required_text, FieldError,
};

/// Address created and linked during employee creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewEmployeeAddress {
    pub address_type_id: i32,
    #[serde(flatten)]
    pub address: AddressInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployeeCommand {
    #[serde(flatten)]
    pub name: PersonName,
    #[serde(default)]
    pub email_promotion: i32,

    pub national_id_number: String,
    pub login_id: String,
    pub job_title: String,
    pub birth_date: NaiveDate,
    pub marital_status: String,
    pub gender: String,
    pub hire_date: NaiveDate,
    #[serde(default = "default_salaried")]
    pub salaried_flag: bool,
    #[serde(default)]
    pub vacation_hours: i16,
    #[serde(default)]
    pub sick_leave_hours: i16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_type_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<NewEmployeeAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub rate: Option<BigDecimal>,
    /// Defaults to 1 (monthly) when `rate` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_frequency: Option<i16>,
}

/// First assignment and pay rate recorded on create
struct Opening<'a> {
    department_id: i16,
    shift_id: i16,
    rate: &'a BigDecimal,
    pay_frequency: i16,
}

fn default_salaried() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum CreateEmployeeError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("An employee with national id '{0}' already exists")]
    DuplicateNationalId(String),

    #[error("An employee with login id '{0}' already exists")]
    DuplicateLoginId(String),

    #[error("Department {0} not found")]
    DepartmentNotFound(i16),

    #[error("Shift {0} not found")]
    ShiftNotFound(i16),

    #[error("Address type {0} not found")]
    AddressTypeNotFound(i32),

    #[error("State/province {0} not found")]
    StateProvinceNotFound(i32),

    #[error("Phone number type {0} not found")]
    PhoneNumberTypeNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CreateEmployeeError> for AppError {
    fn from(e: CreateEmployeeError) -> Self {
        use CreateEmployeeError::*;
        match e {
            Validation(e) => AppError::Validation(e.to_string()),
            DuplicateNationalId(_) | DuplicateLoginId(_) => AppError::Conflict(e.to_string()),
            DepartmentNotFound(_)
            | ShiftNotFound(_)
            | AddressTypeNotFound(_)
            | StateProvinceNotFound(_)
            | PhoneNumberTypeNotFound(_) => AppError::NotFound(e.to_string()),
            Database(e) => AppError::Database(e),
        }
    }
}

impl Request<Result<EmployeeDetails, CreateEmployeeError>> for CreateEmployeeCommand {}

impl crate::cqrs::middleware::Command for CreateEmployeeCommand {}

impl CreateEmployeeCommand {
    pub fn validate(&self) -> Result<(), CreateEmployeeError> {
        self.validate_on(today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), CreateEmployeeError> {
        self.name.validate()?;
        validate_range(self.email_promotion, "email_promotion", 0, 2)?;

        validate_required_text(&self.national_id_number, "national_id_number", NATIONAL_ID_MAX)?;
        validate_required_text(&self.login_id, "login_id", LOGIN_ID_MAX)?;
        validate_required_text(&self.job_title, "job_title", JOB_TITLE_MAX)?;
        validate_birth_date(self.birth_date, today)?;
        validate_marital_status(&self.marital_status)?;
        validate_gender(&self.gender)?;
        validate_hire_date(self.hire_date, "hire_date", today)?;
        validate_pto(self.vacation_hours, self.sick_leave_hours)?;

        if let Some(ref email) = self.email_address {
            validate_email(email, "email_address")?;
        }
        if let Some(ref phone) = self.phone_number {
            validate_phone(phone, "phone_number")?;
        }
        if let Some(ref address) = self.address {
            address.address.validate()?;
        }

        match self.opening()? {
            Some(opening) => {
                if opening.department_id <= 0 {
                    return Err(
                        FieldError::invalid("department_id", "must be greater than 0").into()
                    );
                }
                if opening.shift_id <= 0 {
                    return Err(FieldError::invalid("shift_id", "must be greater than 0").into());
                }
                validate_pay(opening.rate, opening.pay_frequency)?;
            },
            None if self.pay_frequency.is_some() => {
                return Err(FieldError::invalid("pay_frequency", "requires rate").into());
            },
            None => {},
        }

        Ok(())
    }

    /// `None` for a pending employee; assignment and rate are all or nothing
    fn opening(&self) -> Result<Option<Opening<'_>>, FieldError> {
        match (self.department_id, self.shift_id, &self.rate) {
            (Some(department_id), Some(shift_id), Some(rate)) => Ok(Some(Opening {
                department_id,
                shift_id,
                rate,
                pay_frequency: self.pay_frequency.unwrap_or(1),
            })),
            (None, None, None) => Ok(None),
            _ => Err(FieldError::invalid(
                "department_id",
                "department_id, shift_id and rate must be given together",
            )),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.department_id.is_none() && self.shift_id.is_none() && self.rate.is_none()
    }

    fn duplicate_error(&self, error: sqlx::Error) -> CreateEmployeeError {
        if !is_unique_violation(&error) {
            return error.into();
        }
        let constraint = match error {
            sqlx::Error::Database(ref db) => db.constraint().unwrap_or_default().to_string(),
            _ => String::new(),
        };
        if constraint.contains("login_id") {
            CreateEmployeeError::DuplicateLoginId(self.login_id.clone())
        } else {
            CreateEmployeeError::DuplicateNationalId(self.national_id_number.clone())
        }
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(login_id = %command.login_id, department_id = ?command.department_id)
)]
pub async fn handle(
    pool: PgPool,
    command: CreateEmployeeCommand,
) -> Result<EmployeeDetails, CreateEmployeeError> {
    command.validate()?;

    let mut tx = pool.begin().await?;
    check_references(&mut tx, &command).await?;

    let business_entity_id: i32 = sqlx::query_scalar(
        "INSERT INTO person.business_entity (rowguid, modified_date)
         VALUES ($1, NOW())
         RETURNING business_entity_id",
    )
    .bind(Uuid::new_v4())
    .fetch_one(&mut *tx)
    .await?;

    let name = &command.name;
    sqlx::query(
        "INSERT INTO person.person
             (business_entity_id, person_type, name_style, title, first_name, middle_name,
              last_name, suffix, email_promotion, rowguid, modified_date)
         VALUES ($1, 'EM', FALSE, $2, $3, $4, $5, $6, $7, $8, NOW())",
    )
    .bind(business_entity_id)
    .bind(name.title.as_deref())
    .bind(name.first_name.trim())
    .bind(name.middle_name.as_deref())
    .bind(name.last_name.trim())
    .bind(name.suffix.as_deref())
    .bind(command.email_promotion)
    .bind(Uuid::new_v4())
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO humanresources.employee
             (business_entity_id, national_id_number, login_id, job_title, birth_date,
              marital_status, gender, hire_date, salaried_flag, vacation_hours,
              sick_leave_hours, current_flag, rowguid, modified_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())",
    )
    .bind(business_entity_id)
    .bind(command.national_id_number.trim())
    .bind(command.login_id.trim())
    .bind(command.job_title.trim())
    .bind(command.birth_date)
    .bind(&command.marital_status)
    .bind(&command.gender)
    .bind(command.hire_date)
    .bind(command.salaried_flag)
    .bind(command.vacation_hours)
    .bind(command.sick_leave_hours)
    .bind(!command.is_pending())
    .bind(Uuid::new_v4())
    .execute(&mut *tx)
    .await
    .map_err(|e| command.duplicate_error(e))?;

    if let Some(ref email) = command.email_address {
        sqlx::query(
            "INSERT INTO person.email_address (business_entity_id, email_address, rowguid, modified_date)
             VALUES ($1, $2, $3, NOW())",
        )
        .bind(business_entity_id)
        .bind(email.trim())
        .bind(Uuid::new_v4())
        .execute(&mut *tx)
        .await?;
    }

    if let Some(ref phone) = command.phone_number {
        sqlx::query(
            "INSERT INTO person.person_phone
                 (business_entity_id, phone_number, phone_number_type_id, modified_date)
             VALUES ($1, $2, $3, NOW())",
        )
        .bind(business_entity_id)
        .bind(phone.trim())
        .bind(command.phone_number_type_id.unwrap_or(DEFAULT_PHONE_NUMBER_TYPE_ID))
        .execute(&mut *tx)
        .await?;
    }

    if let Some(ref new_address) = command.address {
        let address = insert_address(&mut tx, &new_address.address).await?;
        link_address(
            &mut tx,
            business_entity_id,
            address.address_id,
            new_address.address_type_id,
        )
        .await?;
    }

    if let Some(opening) = command.opening()? {
        sqlx::query(
            "INSERT INTO humanresources.employee_department_history
                 (business_entity_id, department_id, shift_id, start_date, modified_date)
             VALUES ($1, $2, $3, $4, NOW())",
        )
        .bind(business_entity_id)
        .bind(opening.department_id)
        .bind(opening.shift_id)
        .bind(command.hire_date)
        .execute(&mut *tx)
        .await?;

        insert_pay_history(
            &mut tx,
            business_entity_id,
            command.hire_date,
            opening.rate,
            opening.pay_frequency,
        )
        .await?;
    }

    let details = load_employee_details(&mut tx, business_entity_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    tx.commit().await?;

    tracing::info!(business_entity_id, pending = command.is_pending(), "Employee created");

    Ok(details)
}

/// 404 checks for every referenced lookup row, before anything is inserted
async fn check_references(
    conn: &mut PgConnection,
    command: &CreateEmployeeCommand,
) -> Result<(), CreateEmployeeError> {
    if let Some(department_id) = command.department_id {
        if !department_exists(conn, department_id).await? {
            return Err(CreateEmployeeError::DepartmentNotFound(department_id));
        }
    }
    if let Some(shift_id) = command.shift_id {
        if !shift_exists(conn, shift_id).await? {
            return Err(CreateEmployeeError::ShiftNotFound(shift_id));
        }
    }
    if let Some(ref address) = command.address {
        if !address_type_exists(conn, address.address_type_id).await? {
            return Err(CreateEmployeeError::AddressTypeNotFound(address.address_type_id));
        }
        if !state_province_exists(conn, address.address.state_province_id).await? {
            return Err(CreateEmployeeError::StateProvinceNotFound(
                address.address.state_province_id,
            ));
        }
    }
    if command.phone_number.is_some() {
        let type_id = command.phone_number_type_id.unwrap_or(DEFAULT_PHONE_NUMBER_TYPE_ID);
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM person.phone_number_type WHERE phone_number_type_id = $1
             )",
        )
        .bind(type_id)
        .fetch_one(&mut *conn)
        .await?;
        if !exists {
            return Err(CreateEmployeeError::PhoneNumberTypeNotFound(type_id));
        }
    }
    Ok(())
}
