//! Database error classification helpers
//!
//! ```rust,ignore
//! use aw_server::features::shared::error_helpers::map_unique_violation;
//!
//! sqlx::query("INSERT INTO humanresources.department ...")
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| {
//!         map_unique_violation(e, CreateDepartmentError::DuplicateName(name), Into::into)
//!     })?;
//! ```

use sqlx::Error as SqlxError;

/// Kind of constraint a failed statement tripped over
#[derive(Debug)]
pub enum ConstraintViolation {
    UniqueViolation,
    ForeignKeyViolation,
    CheckViolation,
    /// Not a constraint violation
    Other(SqlxError),
}

/// Classify a sqlx error by the constraint it violated
pub fn check_constraint_violation(error: SqlxError) -> ConstraintViolation {
    if let SqlxError::Database(ref db_err) = error {
        if db_err.is_unique_violation() {
            return ConstraintViolation::UniqueViolation;
        }
        if db_err.is_foreign_key_violation() {
            return ConstraintViolation::ForeignKeyViolation;
        }
        if db_err.is_check_violation() {
            return ConstraintViolation::CheckViolation;
        }
    }
    ConstraintViolation::Other(error)
}

pub fn is_unique_violation(error: &SqlxError) -> bool {
    matches!(error, SqlxError::Database(db_err) if db_err.is_unique_violation())
}

pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    matches!(error, SqlxError::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Return `unique_error` on a unique violation, otherwise wrap the original
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

/// Return `fk_error` on a foreign key violation, otherwise wrap the original
pub fn map_foreign_key_violation<E, F>(error: SqlxError, fk_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_foreign_key_violation(&error) {
        fk_error
    } else {
        default_wrapper(error)
    }
}
