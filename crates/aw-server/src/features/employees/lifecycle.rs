//! Employment lifecycle rules
//!
//! Hire, terminate and rehire are pure functions from an
//! [`EmployeeLifecycleState`] to a [`Transition`]. Handlers load the state
//! inside a transaction, ask for a transition, then persist it. Nothing in this
//! module touches the database, so every rule is covered by plain unit tests.
//!
//! ```rust,ignore
//! let state = load_state(&mut tx, id).await?;
//! let transition = lifecycle::terminate(&state, termination_date)?;
//! persist(&mut tx, id, &transition).await?;
//! ```

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Minimum days between the end of the last assignment and a rehire
pub const REHIRE_COOLDOWN_DAYS: i64 = 90;

/// One row of `employee_department_history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistorySpan {
    pub department_id: i16,
    pub shift_id: i16,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl HistorySpan {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Employment facts the rules depend on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeLifecycleState {
    pub current_flag: bool,
    pub hire_date: NaiveDate,
    pub vacation_hours: i16,
    pub sick_leave_hours: i16,
    pub history: Vec<HistorySpan>,
    /// Date of the most recent `employee_pay_history` row
    pub last_rate_change: Option<NaiveDate>,
}

impl EmployeeLifecycleState {
    pub fn open_assignment(&self) -> Option<&HistorySpan> {
        self.history.iter().filter(|h| h.is_open()).max_by_key(|h| h.start_date)
    }

    /// End date of the most recent closed assignment
    pub fn last_termination(&self) -> Option<NaiveDate> {
        self.history.iter().filter_map(|h| h.end_date).max()
    }

    /// Apply `transition` in memory, mirroring what the handlers persist
    pub fn apply(&mut self, transition: &Transition) {
        self.current_flag = transition.current_flag;
        self.hire_date = transition.hire_date;
        self.vacation_hours = transition.vacation_hours;
        self.sick_leave_hours = transition.sick_leave_hours;

        if let Some(end_date) = transition.close_assignment_on {
            for span in self.history.iter_mut().filter(|h| h.is_open()) {
                span.end_date = Some(end_date);
            }
        }
        if let Some(ref span) = transition.open_assignment {
            self.history.push(span.clone());
        }
        if let Some(ref pay) = transition.pay_change {
            self.last_rate_change = Some(pay.rate_change_date);
        }
    }
}

/// Department and shift an employee is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub department_id: i16,
    pub shift_id: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayChange {
    pub rate_change_date: NaiveDate,
    pub rate: BigDecimal,
    pub pay_frequency: i16,
}

/// Everything a lifecycle command changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub action: LifecycleAction,
    pub current_flag: bool,
    pub hire_date: NaiveDate,
    pub vacation_hours: i16,
    pub sick_leave_hours: i16,
    /// Set `end_date` on the open history row
    pub close_assignment_on: Option<NaiveDate>,
    /// New open history row to insert
    pub open_assignment: Option<HistorySpan>,
    pub pay_change: Option<PayChange>,
    /// Vacation plus sick hours settled at termination
    pub pto_hours_paid_out: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    Hire,
    Terminate,
    Rehire,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Employee is already active")]
    AlreadyActive,

    #[error("Employee has employment history; use rehire instead")]
    AlreadyHired,

    #[error("Employee is not active")]
    NotActive,

    #[error("Termination date {termination_date} is before hire date {hire_date}")]
    TerminationBeforeHire {
        termination_date: NaiveDate,
        hire_date: NaiveDate,
    },

    #[error("Rehire date {rehire_date} is before the last termination on {terminated_on}")]
    RehireBeforeTermination {
        rehire_date: NaiveDate,
        terminated_on: NaiveDate,
    },

    #[error("Rehire requires {required} days since termination, only {days_since} have passed")]
    RehireCooldown { days_since: i64, required: i64 },

    #[error("Pay rate change on {rate_change_date} must be later than the latest one on {latest}")]
    PayChangeNotAfterLatest {
        rate_change_date: NaiveDate,
        latest: NaiveDate,
    },
}

/// First hire of an employee record that has never been assigned
pub fn hire(
    state: &EmployeeLifecycleState,
    hire_date: NaiveDate,
    assignment: Assignment,
    rate: BigDecimal,
    pay_frequency: i16,
) -> Result<Transition, LifecycleError> {
    if state.current_flag {
        return Err(LifecycleError::AlreadyActive);
    }
    if !state.history.is_empty() {
        return Err(LifecycleError::AlreadyHired);
    }
    check_pay_order(state, hire_date)?;

    Ok(Transition {
        action: LifecycleAction::Hire,
        current_flag: true,
        hire_date,
        vacation_hours: 0,
        sick_leave_hours: 0,
        close_assignment_on: None,
        open_assignment: Some(open_span(assignment, hire_date)),
        pay_change: Some(PayChange {
            rate_change_date: hire_date,
            rate,
            pay_frequency,
        }),
        pto_hours_paid_out: None,
    })
}

/// End employment; outstanding PTO is paid out and both balances zeroed
pub fn terminate(
    state: &EmployeeLifecycleState,
    termination_date: NaiveDate,
) -> Result<Transition, LifecycleError> {
    if !state.current_flag {
        return Err(LifecycleError::NotActive);
    }
    if termination_date < state.hire_date {
        return Err(LifecycleError::TerminationBeforeHire {
            termination_date,
            hire_date: state.hire_date,
        });
    }

    // Negative vacation is an advance and is not clawed back
    let paid_out = i32::from(state.vacation_hours.max(0)) + i32::from(state.sick_leave_hours);

    Ok(Transition {
        action: LifecycleAction::Terminate,
        current_flag: false,
        hire_date: state.hire_date,
        vacation_hours: 0,
        sick_leave_hours: 0,
        close_assignment_on: state.open_assignment().map(|_| termination_date),
        open_assignment: None,
        pay_change: None,
        pto_hours_paid_out: Some(paid_out),
    })
}

/// Return a former employee to work after the cooldown
pub fn rehire(
    state: &EmployeeLifecycleState,
    rehire_date: NaiveDate,
    assignment: Assignment,
    pay: Option<(BigDecimal, i16)>,
) -> Result<Transition, LifecycleError> {
    if state.current_flag {
        return Err(LifecycleError::AlreadyActive);
    }

    if let Some(terminated_on) = state.last_termination() {
        if rehire_date < terminated_on {
            return Err(LifecycleError::RehireBeforeTermination {
                rehire_date,
                terminated_on,
            });
        }
        let days_since = (rehire_date - terminated_on).num_days();
        if days_since < REHIRE_COOLDOWN_DAYS {
            return Err(LifecycleError::RehireCooldown {
                days_since,
                required: REHIRE_COOLDOWN_DAYS,
            });
        }
    }
    if pay.is_some() {
        check_pay_order(state, rehire_date)?;
    }

    Ok(Transition {
        action: LifecycleAction::Rehire,
        current_flag: true,
        hire_date: rehire_date,
        vacation_hours: 0,
        sick_leave_hours: 0,
        close_assignment_on: None,
        open_assignment: Some(open_span(assignment, rehire_date)),
        pay_change: pay.map(|(rate, pay_frequency)| PayChange {
            rate_change_date: rehire_date,
            rate,
            pay_frequency,
        }),
        pto_hours_paid_out: None,
    })
}

/// Pay history only grows forward in time
fn check_pay_order(
    state: &EmployeeLifecycleState,
    rate_change_date: NaiveDate,
) -> Result<(), LifecycleError> {
    match state.last_rate_change {
        Some(latest) if rate_change_date <= latest => {
            Err(LifecycleError::PayChangeNotAfterLatest {
                rate_change_date,
                latest,
            })
        },
        _ => Ok(()),
    }
}

fn open_span(assignment: Assignment, start_date: NaiveDate) -> HistorySpan {
    HistorySpan {
        department_id: assignment.department_id,
        shift_id: assignment.shift_id,
        start_date,
        end_date: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment() -> Assignment {
        Assignment {
            department_id: 1,
            shift_id: 1,
        }
    }

    fn rate() -> BigDecimal {
        BigDecimal::from(25)
    }

    fn never_hired() -> EmployeeLifecycleState {
        EmployeeLifecycleState {
            current_flag: false,
            hire_date: date(2020, 1, 6),
            vacation_hours: 0,
            sick_leave_hours: 0,
            history: vec![],
            last_rate_change: None,
        }
    }

    fn active() -> EmployeeLifecycleState {
        EmployeeLifecycleState {
            current_flag: true,
            hire_date: date(2020, 1, 6),
            vacation_hours: 32,
            sick_leave_hours: 20,
            history: vec![HistorySpan {
                department_id: 1,
                shift_id: 1,
                start_date: date(2020, 1, 6),
                end_date: None,
            }],
            last_rate_change: Some(date(2020, 1, 6)),
        }
    }

    fn terminated_on(end: NaiveDate) -> EmployeeLifecycleState {
        let mut state = active();
        let transition = terminate(&state, end).unwrap();
        state.apply(&transition);
        state
    }

    #[test]
    fn test_hire_opens_assignment_and_pay() {
        let transition = hire(&never_hired(), date(2024, 3, 1), assignment(), rate(), 2).unwrap();
        assert!(transition.current_flag);
        assert_eq!(transition.hire_date, date(2024, 3, 1));
        assert_eq!(transition.open_assignment.as_ref().unwrap().start_date, date(2024, 3, 1));
        assert_eq!(transition.pay_change.as_ref().unwrap().rate_change_date, date(2024, 3, 1));
        assert_eq!((transition.vacation_hours, transition.sick_leave_hours), (0, 0));
    }

    #[test]
    fn test_hire_rejects_active_and_previously_hired() {
        assert_eq!(
            hire(&active(), date(2024, 3, 1), assignment(), rate(), 1),
            Err(LifecycleError::AlreadyActive)
        );
        let former = terminated_on(date(2023, 1, 1));
        assert_eq!(
            hire(&former, date(2024, 3, 1), assignment(), rate(), 1),
            Err(LifecycleError::AlreadyHired)
        );
    }

    #[test]
    fn test_terminate_closes_exactly_one_row_and_pays_out_pto() {
        let mut state = active();
        let transition = terminate(&state, date(2024, 5, 31)).unwrap();
        assert_eq!(transition.pto_hours_paid_out, Some(52));
        assert_eq!(transition.close_assignment_on, Some(date(2024, 5, 31)));

        state.apply(&transition);
        assert!(!state.current_flag);
        assert_eq!((state.vacation_hours, state.sick_leave_hours), (0, 0));
        assert!(state.open_assignment().is_none());
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].end_date, Some(date(2024, 5, 31)));
    }

    #[test]
    fn test_terminate_does_not_pay_out_negative_vacation() {
        let mut state = active();
        state.vacation_hours = -16;
        state.sick_leave_hours = 8;
        let transition = terminate(&state, date(2024, 5, 31)).unwrap();
        assert_eq!(transition.pto_hours_paid_out, Some(8));
        assert_eq!(transition.vacation_hours, 0);
    }

    #[test]
    fn test_terminate_without_open_assignment_closes_nothing() {
        let mut state = active();
        state.history.clear();
        let transition = terminate(&state, date(2024, 5, 31)).unwrap();
        assert_eq!(transition.close_assignment_on, None);
    }

    #[test]
    fn test_terminate_errors() {
        assert_eq!(terminate(&never_hired(), date(2024, 1, 1)), Err(LifecycleError::NotActive));
        assert_eq!(
            terminate(&active(), date(2019, 12, 31)),
            Err(LifecycleError::TerminationBeforeHire {
                termination_date: date(2019, 12, 31),
                hire_date: date(2020, 1, 6),
            })
        );
    }

    #[test]
    fn test_terminate_on_hire_date_is_allowed() {
        assert!(terminate(&active(), date(2020, 1, 6)).is_ok());
    }

    #[test]
    fn test_rehire_cooldown_boundary() {
        let end = date(2024, 1, 31);
        let state = terminated_on(end);

        let day_89 = end.checked_add_days(Days::new(89)).unwrap();
        assert_eq!(
            rehire(&state, day_89, assignment(), None),
            Err(LifecycleError::RehireCooldown {
                days_since: 89,
                required: REHIRE_COOLDOWN_DAYS,
            })
        );

        let day_90 = end.checked_add_days(Days::new(90)).unwrap();
        assert!(rehire(&state, day_90, assignment(), None).is_ok());
    }

    #[test]
    fn test_rehire_same_day_is_cooldown_error() {
        let end = date(2024, 1, 31);
        assert!(matches!(
            rehire(&terminated_on(end), end, assignment(), None),
            Err(LifecycleError::RehireCooldown { days_since: 0, .. })
        ));
    }

    #[test]
    fn test_rehire_before_termination() {
        let end = date(2024, 1, 31);
        assert_eq!(
            rehire(&terminated_on(end), date(2024, 1, 1), assignment(), None),
            Err(LifecycleError::RehireBeforeTermination {
                rehire_date: date(2024, 1, 1),
                terminated_on: end,
            })
        );
    }

    #[test]
    fn test_rehire_appends_exactly_one_open_row() {
        let mut state = terminated_on(date(2024, 1, 31));
        let rehire_date = date(2024, 6, 1);
        let transition = rehire(
            &state,
            rehire_date,
            Assignment {
                department_id: 3,
                shift_id: 2,
            },
            Some((rate(), 1)),
        )
        .unwrap();
        assert_eq!(transition.hire_date, rehire_date);
        assert_eq!(transition.pay_change.as_ref().unwrap().rate_change_date, rehire_date);

        state.apply(&transition);
        assert!(state.current_flag);
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history.iter().filter(|h| h.is_open()).count(), 1);
        assert_eq!(state.open_assignment().unwrap().department_id, 3);
    }

    #[test]
    fn test_rehire_without_rate_leaves_pay_alone() {
        let state = terminated_on(date(2024, 1, 31));
        let transition = rehire(&state, date(2024, 6, 1), assignment(), None).unwrap();
        assert!(transition.pay_change.is_none());
    }

    #[test]
    fn test_rehire_without_closed_history_skips_cooldown() {
        let transition = rehire(&never_hired(), date(2024, 6, 1), assignment(), None).unwrap();
        assert_eq!(transition.action, LifecycleAction::Rehire);
    }

    #[test]
    fn test_rehire_rejects_active() {
        assert_eq!(
            rehire(&active(), date(2024, 6, 1), assignment(), None),
            Err(LifecycleError::AlreadyActive)
        );
    }

    #[test]
    fn test_cooldown_measured_from_latest_termination() {
        let mut state = terminated_on(date(2022, 1, 31));
        let transition = rehire(&state, date(2022, 6, 1), assignment(), None).unwrap();
        state.apply(&transition);
        let transition = terminate(&state, date(2024, 1, 31)).unwrap();
        state.apply(&transition);

        assert_eq!(state.last_termination(), Some(date(2024, 1, 31)));
        assert!(matches!(
            rehire(&state, date(2024, 3, 1), assignment(), None),
            Err(LifecycleError::RehireCooldown { days_since: 30, .. })
        ));
    }

    #[test]
    fn test_rehire_pay_must_follow_latest_rate_change() {
        let mut state = terminated_on(date(2024, 1, 31));
        state.last_rate_change = Some(date(2024, 12, 1));

        assert_eq!(
            rehire(&state, date(2024, 6, 1), assignment(), Some((rate(), 1))),
            Err(LifecycleError::PayChangeNotAfterLatest {
                rate_change_date: date(2024, 6, 1),
                latest: date(2024, 12, 1),
            })
        );
        // Without a rate nothing is written to pay history
        assert!(rehire(&state, date(2024, 6, 1), assignment(), None).is_ok());
        assert!(rehire(&state, date(2024, 12, 2), assignment(), Some((rate(), 1))).is_ok());
    }

    #[test]
    fn test_hire_pay_must_follow_latest_rate_change() {
        let mut state = never_hired();
        state.last_rate_change = Some(date(2024, 3, 1));
        assert!(matches!(
            hire(&state, date(2024, 3, 1), assignment(), rate(), 1),
            Err(LifecycleError::PayChangeNotAfterLatest { .. })
        ));
    }
}
