//! Error type for `company-store-postgres`.

use company_core::ConstraintKind;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] company_core::Error),

  /// The database rejected a statement for violating an integrity rule.
  #[error("{kind} constraint violated: {message}")]
  Constraint {
    kind:       ConstraintKind,
    /// Constraint name as reported by PostgreSQL, e.g. `uq_person_email`.
    constraint: Option<String>,
    message:    String,
  },

  #[error("database error: {0}")]
  Database(#[source] sqlx::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<sqlx::Error> for Error {
  fn from(err: sqlx::Error) -> Self {
    if let sqlx::Error::Database(db) = &err {
      let kind = match db.kind() {
        ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
        ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
        ErrorKind::CheckViolation => Some(ConstraintKind::Check),
        ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
        // SQLSTATE class 23 is "integrity constraint violation".
        _ if db.code().is_some_and(|c| c.starts_with("23")) => {
          Some(ConstraintKind::Other)
        }
        _ => None,
      };

      if let Some(kind) = kind {
        return Error::Constraint {
          kind,
          constraint: db.constraint().map(str::to_owned),
          message: db.message().to_owned(),
        };
      }
    }
    Error::Database(err)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn non_database_errors_pass_through() {
    let err = Error::from(sqlx::Error::RowNotFound);
    assert!(matches!(err, Error::Database(sqlx::Error::RowNotFound)));
  }
}
