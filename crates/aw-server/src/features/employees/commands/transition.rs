//! Loading and persisting lifecycle state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use utoipa::ToSchema;

use crate::features::employees::lifecycle::{
    EmployeeLifecycleState, HistorySpan, LifecycleAction, Transition,
};
use crate::features::employees::types::insert_pay_history;

/// Result of hire, terminate or rehire
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LifecycleResponse {
    pub business_entity_id: i32,
    pub action: LifecycleAction,
    pub effective_date: NaiveDate,
    pub current_flag: bool,
    pub hire_date: NaiveDate,
    pub vacation_hours: i16,
    pub sick_leave_hours: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pto_hours_paid_out: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LifecycleResponse {
    pub(crate) fn new(business_entity_id: i32, effective_date: NaiveDate, t: &Transition) -> Self {
        Self {
            business_entity_id,
            action: t.action,
            effective_date,
            current_flag: t.current_flag,
            hire_date: t.hire_date,
            vacation_hours: t.vacation_hours,
            sick_leave_hours: t.sick_leave_hours,
            department_id: t.open_assignment.as_ref().map(|s| s.department_id),
            shift_id: t.open_assignment.as_ref().map(|s| s.shift_id),
            pto_hours_paid_out: t.pto_hours_paid_out,
            reason: None,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeStateRow {
    current_flag: bool,
    hire_date: NaiveDate,
    vacation_hours: i16,
    sick_leave_hours: i16,
}

/// Lock the employee row and read its lifecycle state; `None` if missing
pub(crate) async fn load_state(
    conn: &mut PgConnection,
    business_entity_id: i32,
) -> Result<Option<EmployeeLifecycleState>, sqlx::Error> {
    let row = sqlx::query_as::<_, EmployeeStateRow>(
        "SELECT current_flag, hire_date, vacation_hours, sick_leave_hours
         FROM humanresources.employee
         WHERE business_entity_id = $1
         FOR UPDATE",
    )
    .bind(business_entity_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let history = sqlx::query_as::<_, HistorySpan>(
        "SELECT department_id, shift_id, start_date, end_date
         FROM humanresources.employee_department_history
         WHERE business_entity_id = $1
         ORDER BY start_date",
    )
    .bind(business_entity_id)
    .fetch_all(&mut *conn)
    .await?;

    let last_rate_change: Option<NaiveDate> = sqlx::query_scalar(
        "SELECT MAX(rate_change_date)
         FROM humanresources.employee_pay_history
         WHERE business_entity_id = $1",
    )
    .bind(business_entity_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Some(EmployeeLifecycleState {
        current_flag: row.current_flag,
        hire_date: row.hire_date,
        vacation_hours: row.vacation_hours,
        sick_leave_hours: row.sick_leave_hours,
        history,
        last_rate_change,
    }))
}

/// Write every change in `transition`; the caller owns the transaction
pub(crate) async fn persist(
    conn: &mut PgConnection,
    business_entity_id: i32,
    transition: &Transition,
    job_title: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE humanresources.employee
         SET current_flag = $2, hire_date = $3, vacation_hours = $4, sick_leave_hours = $5,
             job_title = COALESCE($6, job_title), modified_date = NOW()
         WHERE business_entity_id = $1",
    )
    .bind(business_entity_id)
    .bind(transition.current_flag)
    .bind(transition.hire_date)
    .bind(transition.vacation_hours)
    .bind(transition.sick_leave_hours)
    .bind(job_title)
    .execute(&mut *conn)
    .await?;

    if let Some(end_date) = transition.close_assignment_on {
        sqlx::query(
            "UPDATE humanresources.employee_department_history
             SET end_date = $2, modified_date = NOW()
             WHERE business_entity_id = $1 AND end_date IS NULL",
        )
        .bind(business_entity_id)
        .bind(end_date)
        .execute(&mut *conn)
        .await?;
    }

    if let Some(ref span) = transition.open_assignment {
        sqlx::query(
            "INSERT INTO humanresources.employee_department_history
                 (business_entity_id, department_id, shift_id, start_date, modified_date)
             VALUES ($1, $2, $3, $4, NOW())",
        )
        .bind(business_entity_id)
        .bind(span.department_id)
        .bind(span.shift_id)
        .bind(span.start_date)
        .execute(&mut *conn)
        .await?;
    }

    if let Some(ref pay) = transition.pay_change {
        insert_pay_history(
            conn,
            business_entity_id,
            pay.rate_change_date,
            &pay.rate,
            pay.pay_frequency,
        )
        .await?;
    }

    Ok(())
}
