use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load settings for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database operation failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// The addressed row does not exist (or a filter matched nothing).
    #[error("{0}")]
    NotFound(String),

    /// The write would duplicate an identity or orphan dependent rows.
    #[error("{0}")]
    Conflict(String),

    /// A foreign key points at a bank that does not exist.
    #[error("{0}")]
    InvalidReference(String),
}

/// PostgreSQL `restrict_violation` (SQLSTATE 23001).
const PG_RESTRICT_VIOLATION: &str = "23001";
/// SQLite `SQLITE_CONSTRAINT_TRIGGER`, raised by `ON DELETE RESTRICT` actions.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

/// Returns the constraint class of a failed statement, if the store reported one.
///
/// The pre-checks in the repositories only produce friendlier messages; this is
/// what catches the writes that raced past them. Restrict violations count as
/// foreign key violations: sqlx leaves them as `Other`.
pub(crate) fn violation_kind(err: &sqlx::Error) -> Option<ErrorKind> {
    match err {
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::Other => match db_err.code().as_deref() {
                Some(PG_RESTRICT_VIOLATION | SQLITE_CONSTRAINT_TRIGGER) => {
                    Some(ErrorKind::ForeignKeyViolation)
                }
                _ => None,
            },
            kind => Some(kind),
        },
        _ => None,
    }
}
