//! Task store error types.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// A named integrity rule on the `task` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `task_mode_check`: mode is one of the allowed values.
    TaskMode,
    /// `task_priority_check`: priority is one of the allowed values.
    TaskPriority,
    /// `task_deviceid_fkey`: the device exists.
    TaskDevice,
    /// Any other named constraint.
    Other(String),
    /// The driver did not report a constraint name.
    Unnamed,
}

impl Constraint {
    /// Name of the mode check constraint.
    pub const TASK_MODE_CHECK: &'static str = "task_mode_check";
    /// Name of the priority check constraint.
    pub const TASK_PRIORITY_CHECK: &'static str = "task_priority_check";
    /// Name of the device foreign key.
    pub const TASK_DEVICE_FKEY: &'static str = "task_deviceid_fkey";

    /// Identifies a constraint by the name the database reports.
    pub fn from_name(name: &str) -> Self {
        match name {
            Self::TASK_MODE_CHECK => Self::TaskMode,
            Self::TASK_PRIORITY_CHECK => Self::TaskPriority,
            Self::TASK_DEVICE_FKEY => Self::TaskDevice,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Entity not found.
    #[error("{entity_type} with given id ({id}) was not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A write was rejected by a check constraint.
    #[error("Check constraint violation: {constraint:?}")]
    CheckViolation { constraint: Constraint },

    /// A write referenced a row that does not exist.
    #[error("Foreign key constraint violation: {constraint:?}")]
    ForeignKeyViolation { constraint: Constraint },

    /// Database error.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl TaskStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a check violation for the given constraint.
    pub fn check_violation(constraint: Constraint) -> Self {
        Self::CheckViolation { constraint }
    }

    /// Creates a foreign key violation for the given constraint.
    pub fn foreign_key_violation(constraint: Constraint) -> Self {
        Self::ForeignKeyViolation { constraint }
    }
}

impl From<sqlx::Error> for TaskStoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err
                .constraint()
                .map_or(Constraint::Unnamed, Constraint::from_name);
            match db_err.kind() {
                ErrorKind::CheckViolation => return Self::check_violation(constraint),
                ErrorKind::ForeignKeyViolation => return Self::foreign_key_violation(constraint),
                _ => {}
            }
        }
        Self::Database(err)
    }
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
