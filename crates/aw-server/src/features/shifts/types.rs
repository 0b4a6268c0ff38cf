use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::shared::validation::{validate_required_text, FieldError};

pub const SHIFT_NAME_MAX: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema, PartialEq, Eq)]
pub struct Shift {
    pub shift_id: i16,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub modified_date: DateTime<Utc>,
}

pub(crate) const SHIFT_COLUMNS: &str = "shift_id, name, start_time, end_time, modified_date";

/// Checks shared by create and update
pub(crate) fn validate_shift_fields(
    name: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<(), FieldError> {
    validate_required_text(name, "name", SHIFT_NAME_MAX)?;
    if start_time == end_time {
        return Err(FieldError::invalid("end_time", "must differ from start_time"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_overnight_shift_is_valid() {
        assert!(validate_shift_fields("Night", time(23), time(7)).is_ok());
    }

    #[test]
    fn test_zero_length_shift_is_rejected() {
        let err = validate_shift_fields("Day", time(7), time(7)).unwrap_err();
        assert_eq!(err.to_string(), "end_time must differ from start_time");
    }
}
