//! Employee DTOs, field rules and shared loaders

use bigdecimal::BigDecimal;
use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_code, validate_date_range, validate_optional_text, validate_range,
    validate_required_text, FieldError,
};

pub const GENDERS: &[&str] = &["M", "F"];
pub const MARITAL_STATUSES: &[&str] = &["M", "S"];
/// 1 = monthly, 2 = biweekly
pub const PAY_FREQUENCIES: &[i16] = &[1, 2];

pub const VACATION_HOURS_MIN: i16 = -40;
pub const VACATION_HOURS_MAX: i16 = 240;
pub const SICK_LEAVE_HOURS_MIN: i16 = 0;
pub const SICK_LEAVE_HOURS_MAX: i16 = 120;

pub const MINIMUM_AGE_YEARS: u32 = 18;

pub const NAME_MAX: usize = 50;
pub const TITLE_MAX: usize = 8;
pub const SUFFIX_MAX: usize = 10;
pub const NATIONAL_ID_MAX: usize = 15;
pub const LOGIN_ID_MAX: usize = 256;
pub const JOB_TITLE_MAX: usize = 50;

/// Phone type used when a create request omits one (Cell)
pub const DEFAULT_PHONE_NUMBER_TYPE_ID: i32 = 1;

pub fn earliest_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1930, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn earliest_hire_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1996, 7, 1).unwrap_or(NaiveDate::MIN)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn min_rate() -> BigDecimal {
    BigDecimal::from(650) / BigDecimal::from(100)
}

pub fn max_rate() -> BigDecimal {
    BigDecimal::from(200)
}

pub fn validate_gender(value: &str) -> Result<(), FieldError> {
    validate_code(value, "gender", GENDERS)
}

pub fn validate_marital_status(value: &str) -> Result<(), FieldError> {
    validate_code(value, "marital_status", MARITAL_STATUSES)
}

/// Born on or after 1930-01-01 and at least 18 years old on `today`
pub fn validate_birth_date(value: NaiveDate, today: NaiveDate) -> Result<(), FieldError> {
    let latest = today
        .checked_sub_months(Months::new(MINIMUM_AGE_YEARS * 12))
        .unwrap_or(today);
    validate_date_range(value, "birth_date", earliest_birth_date(), latest)
}

/// Between 1996-07-01 and tomorrow, inclusive
pub fn validate_hire_date(
    value: NaiveDate,
    field: &'static str,
    today: NaiveDate,
) -> Result<(), FieldError> {
    let latest = today.checked_add_days(Days::new(1)).unwrap_or(today);
    validate_date_range(value, field, earliest_hire_date(), latest)
}

pub fn validate_pto(vacation_hours: i16, sick_leave_hours: i16) -> Result<(), FieldError> {
    validate_range(vacation_hours, "vacation_hours", VACATION_HOURS_MIN, VACATION_HOURS_MAX)?;
    validate_range(
        sick_leave_hours,
        "sick_leave_hours",
        SICK_LEAVE_HOURS_MIN,
        SICK_LEAVE_HOURS_MAX,
    )
}

pub fn validate_pay(rate: &BigDecimal, pay_frequency: i16) -> Result<(), FieldError> {
    validate_range(rate.clone(), "rate", min_rate(), max_rate())?;
    if !PAY_FREQUENCIES.contains(&pay_frequency) {
        return Err(FieldError::NotAllowed {
            field: "pay_frequency",
            allowed: "1, 2".to_string(),
        });
    }
    Ok(())
}

/// Person name fields shared by create and update
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PersonName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl PersonName {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_optional_text(self.title.as_deref(), "title", TITLE_MAX)?;
        validate_required_text(&self.first_name, "first_name", NAME_MAX)?;
        validate_optional_text(self.middle_name.as_deref(), "middle_name", NAME_MAX)?;
        validate_required_text(&self.last_name, "last_name", NAME_MAX)?;
        validate_optional_text(self.suffix.as_deref(), "suffix", SUFFIX_MAX)?;
        Ok(())
    }
}

/// Row returned by the employee list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeSummary {
    pub business_entity_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub login_id: String,
    pub job_title: String,
    pub hire_date: NaiveDate,
    pub current_flag: bool,
    pub department_id: Option<i16>,
    pub department_name: Option<String>,
}

/// Employee with person name, primary contact and current assignment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeDetails {
    pub business_entity_id: i32,
    pub national_id_number: String,
    pub login_id: String,
    pub job_title: String,
    pub birth_date: NaiveDate,
    pub marital_status: String,
    pub gender: String,
    pub hire_date: NaiveDate,
    pub salaried_flag: bool,
    pub vacation_hours: i16,
    pub sick_leave_hours: i16,
    pub current_flag: bool,
    pub rowguid: Uuid,
    pub modified_date: DateTime<Utc>,
    pub title: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub email_promotion: i32,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub department_id: Option<i16>,
    pub department_name: Option<String>,
    pub shift_id: Option<i16>,
    pub shift_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema, PartialEq, Eq)]
pub struct DepartmentHistoryEntry {
    pub department_id: i16,
    pub department_name: String,
    pub shift_id: i16,
    pub shift_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayHistoryEntry {
    pub rate_change_date: NaiveDate,
    #[schema(value_type = String)]
    pub rate: BigDecimal,
    pub pay_frequency: i16,
    pub modified_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeAddress {
    pub address_id: i32,
    pub address_type_id: i32,
    pub address_type: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province_id: i32,
    pub postal_code: String,
}

pub(crate) async fn load_employee_details(
    conn: &mut PgConnection,
    business_entity_id: i32,
) -> Result<Option<EmployeeDetails>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeDetails>(
        "SELECT e.business_entity_id, e.national_id_number, e.login_id, e.job_title,
                e.birth_date, e.marital_status, e.gender, e.hire_date, e.salaried_flag,
                e.vacation_hours, e.sick_leave_hours, e.current_flag, e.rowguid, e.modified_date,
                p.title, p.first_name, p.middle_name, p.last_name, p.suffix, p.email_promotion,
                em.email_address, ph.phone_number,
                h.department_id, d.name AS department_name, h.shift_id, s.name AS shift_name
         FROM humanresources.employee e
         JOIN person.person p ON p.business_entity_id = e.business_entity_id
         LEFT JOIN LATERAL (
             SELECT email_address FROM person.email_address
             WHERE business_entity_id = e.business_entity_id
             ORDER BY email_address_id LIMIT 1
         ) em ON TRUE
         LEFT JOIN LATERAL (
             SELECT phone_number FROM person.person_phone
             WHERE business_entity_id = e.business_entity_id
             ORDER BY modified_date LIMIT 1
         ) ph ON TRUE
         LEFT JOIN LATERAL (
             SELECT department_id, shift_id FROM humanresources.employee_department_history
             WHERE business_entity_id = e.business_entity_id AND end_date IS NULL
             ORDER BY start_date DESC LIMIT 1
         ) h ON TRUE
         LEFT JOIN humanresources.department d ON d.department_id = h.department_id
         LEFT JOIN humanresources.shift s ON s.shift_id = h.shift_id
         WHERE e.business_entity_id = $1",
    )
    .bind(business_entity_id)
    .fetch_optional(conn)
    .await
}

pub(crate) async fn employee_exists(
    conn: &mut PgConnection,
    business_entity_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM humanresources.employee WHERE business_entity_id = $1)",
    )
    .bind(business_entity_id)
    .fetch_one(conn)
    .await
}

pub(crate) async fn department_exists(
    conn: &mut PgConnection,
    department_id: i16,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM humanresources.department WHERE department_id = $1)",
    )
    .bind(department_id)
    .fetch_one(conn)
    .await
}

pub(crate) async fn shift_exists(conn: &mut PgConnection, shift_id: i16) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM humanresources.shift WHERE shift_id = $1)")
        .bind(shift_id)
        .fetch_one(conn)
        .await
}

pub(crate) async fn insert_pay_history(
    conn: &mut PgConnection,
    business_entity_id: i32,
    rate_change_date: NaiveDate,
    rate: &BigDecimal,
    pay_frequency: i16,
) -> Result<PayHistoryEntry, sqlx::Error> {
    sqlx::query_as::<_, PayHistoryEntry>(
        "INSERT INTO humanresources.employee_pay_history
             (business_entity_id, rate_change_date, rate, pay_frequency, modified_date)
         VALUES ($1, $2, $3, $4, NOW())
         RETURNING rate_change_date, rate, pay_frequency, modified_date",
    )
    .bind(business_entity_id)
    .bind(rate_change_date)
    .bind(rate)
    .bind(pay_frequency)
    .fetch_one(conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_codes() {
        assert!(validate_gender("F").is_ok());
        assert!(validate_gender("f").is_err());
        assert!(validate_marital_status("S").is_ok());
        assert!(validate_marital_status("D").is_err());
    }

    #[test]
    fn test_birth_date_bounds() {
        let today = date(2024, 6, 15);
        assert!(validate_birth_date(date(1930, 1, 1), today).is_ok());
        assert!(validate_birth_date(date(1929, 12, 31), today).is_err());
        assert!(validate_birth_date(date(2006, 6, 15), today).is_ok());
        assert!(validate_birth_date(date(2006, 6, 16), today).is_err());
    }

    #[test]
    fn test_hire_date_bounds() {
        let today = date(2024, 6, 15);
        assert!(validate_hire_date(date(1996, 7, 1), "hire_date", today).is_ok());
        assert!(validate_hire_date(date(1996, 6, 30), "hire_date", today).is_err());
        assert!(validate_hire_date(date(2024, 6, 16), "hire_date", today).is_ok());
        assert!(validate_hire_date(date(2024, 6, 17), "hire_date", today).is_err());
    }

    #[test]
    fn test_pto_bounds() {
        assert!(validate_pto(-40, 0).is_ok());
        assert!(validate_pto(240, 120).is_ok());
        assert!(validate_pto(-41, 0).is_err());
        assert!(validate_pto(0, 121).is_err());
        assert!(validate_pto(0, -1).is_err());
    }

    #[test]
    fn test_pay_bounds() {
        let rate = |s: &str| BigDecimal::from_str(s).unwrap();
        assert!(validate_pay(&rate("6.50"), 1).is_ok());
        assert!(validate_pay(&rate("200.00"), 2).is_ok());
        assert!(validate_pay(&rate("6.49"), 1).is_err());
        assert!(validate_pay(&rate("200.01"), 1).is_err());
        assert!(matches!(
            validate_pay(&rate("25"), 3),
            Err(FieldError::NotAllowed { field: "pay_frequency", .. })
        ));
    }

    #[test]
    fn test_person_name() {
        let name = PersonName {
            first_name: "Ken".to_string(),
            last_name: "Sánchez".to_string(),
            ..Default::default()
        };
        assert!(name.validate().is_ok());

        let name = PersonName {
            title: Some("Professor".to_string()),
            ..name
        };
        assert!(matches!(name.validate(), Err(FieldError::TooLong { field: "title", .. })));
    }
}
