//! Repository error taxonomy.
//!
//! # Responsibility
//! - Surface uniqueness, referential-integrity and domain violations as
//!   distinct variants instead of opaque SQLite failures.
//! - Classify SQLite constraint failures by extended result code.
//!
//! # Invariants
//! - Constraint failures are never retried or silently corrected.

use crate::db::DbError;
use crate::model::DomainError;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// Domain/range violation: bad goal progress, unknown task status, or a
    /// storage `CHECK` failure.
    Domain(DomainError),
    /// Write would duplicate a value in a unique column.
    UniqueViolation {
        table: &'static str,
        column: &'static str,
    },
    /// Write references a missing row, or delete is blocked by dependants.
    ForeignKeyViolation { table: &'static str },
    NotFound { entity: &'static str, id: i64 },
    /// Update/delete requested for a record that was never persisted.
    MissingId(&'static str),
    /// Create requested for a record that already carries a primary key.
    IdAlreadyAssigned { entity: &'static str, id: i64 },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
    Db(DbError),
}

/// Coarse classification of [`RepoError`] for callers that only branch on
/// the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Uniqueness,
    ReferentialIntegrity,
    Domain,
    NotFound,
    Identity,
    Storage,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Domain,
            Self::UniqueViolation { .. } => ErrorKind::Uniqueness,
            Self::ForeignKeyViolation { .. } => ErrorKind::ReferentialIntegrity,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MissingId(_) | Self::IdAlreadyAssigned { .. } => ErrorKind::Identity,
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_)
            | Self::Db(_) => ErrorKind::Storage,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::UniqueViolation { table, column } => {
                write!(f, "uniqueness violation on `{table}.{column}`")
            }
            Self::ForeignKeyViolation { table } => {
                write!(f, "referential integrity violation on `{table}`")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingId(entity) => write!(f, "{entity} has no id; persist it first"),
            Self::IdAlreadyAssigned { entity, id } => {
                write!(f, "{entity} already has id {id}; ids are assigned by the store")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for RepoError {
    fn from(value: DomainError) -> Self {
        Self::Domain(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a failed write on `table` to a semantic error.
///
/// `unique_columns` lists the table's unique columns; SQLite names the
/// offending one in the message as `table.column`.
pub(crate) fn classify_write_error(
    err: rusqlite::Error,
    table: &'static str,
    unique_columns: &[&'static str],
) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    if let Some(column) =
                        unique_column_from_message(message.as_deref(), table, unique_columns)
                    {
                        return RepoError::UniqueViolation { table, column };
                    }
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return RepoError::ForeignKeyViolation { table };
                }
                ffi::SQLITE_CONSTRAINT_CHECK => {
                    return RepoError::Domain(DomainError::CheckConstraint {
                        table,
                        message: message.clone().unwrap_or_default(),
                    });
                }
                _ => {}
            }
        }
    }
    RepoError::from(err)
}

fn unique_column_from_message(
    message: Option<&str>,
    table: &str,
    unique_columns: &[&'static str],
) -> Option<&'static str> {
    if let Some(message) = message {
        let named = unique_columns
            .iter()
            .copied()
            .find(|column| message.ends_with(&format!("{table}.{column}")));
        if named.is_some() {
            return named;
        }
    }
    // Only one candidate: the message shape is irrelevant.
    match unique_columns {
        [only] => Some(*only),
        _ => None,
    }
}
