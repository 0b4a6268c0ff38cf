use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum length of `name` and `group_name`
pub const DEPARTMENT_NAME_MAX: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema, PartialEq, Eq)]
pub struct Department {
    pub department_id: i16,
    pub name: String,
    pub group_name: String,
    pub modified_date: DateTime<Utc>,
}

pub(crate) const DEPARTMENT_COLUMNS: &str = "department_id, name, group_name, modified_date";
