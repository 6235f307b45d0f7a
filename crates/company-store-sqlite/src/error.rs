//! Error type for `company-store-sqlite`.

use company_core::ConstraintKind;
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] company_core::Error),

  /// The database rejected a statement for violating an integrity rule.
  #[error("{kind} constraint violated: {message}")]
  Constraint {
    kind:       ConstraintKind,
    /// Constraint name or `table.column`, when SQLite reports one.
    constraint: Option<String>,
    message:    String,
  },

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      code,
      Some(message),
    )) = &err
      && code.code == rusqlite::ErrorCode::ConstraintViolation
    {
      let kind = classify(code.extended_code);
      return Error::Constraint {
        kind,
        constraint: constraint_name(kind, message),
        message: message.clone(),
      };
    }
    Error::Database(err)
  }
}

impl From<rusqlite::Error> for Error {
  fn from(err: rusqlite::Error) -> Self {
    tokio_rusqlite::Error::Rusqlite(err).into()
  }
}

fn classify(extended_code: i32) -> ConstraintKind {
  match extended_code {
    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
      ConstraintKind::Unique
    }
    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
    // The schema only uses RAISE(ABORT) to emulate checks SQLite cannot
    // express as CHECK constraints.
    ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_TRIGGER => {
      ConstraintKind::Check
    }
    ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
    _ => ConstraintKind::Other,
  }
}

/// Pull the constraint identifier out of SQLite's message:
/// `"UNIQUE constraint failed: person.email"`,
/// `"CHECK constraint failed: chk_employee_salary"`, or the
/// `"chk_name: reason"` text raised by the schema's triggers.
fn constraint_name(kind: ConstraintKind, message: &str) -> Option<String> {
  if let Some((_, name)) = message.split_once("constraint failed: ") {
    return Some(name.trim().to_owned());
  }
  match kind {
    ConstraintKind::Check => message
      .split_once(':')
      .map(|(name, _)| name.trim().to_owned()),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_are_taken_from_sqlite_messages() {
    assert_eq!(
      constraint_name(
        ConstraintKind::Unique,
        "UNIQUE constraint failed: person.email"
      )
      .as_deref(),
      Some("person.email")
    );
    assert_eq!(
      constraint_name(
        ConstraintKind::Check,
        "chk_employee_hire_date: hire date cannot be in the future"
      )
      .as_deref(),
      Some("chk_employee_hire_date")
    );
    assert_eq!(
      constraint_name(ConstraintKind::ForeignKey, "FOREIGN KEY constraint failed"),
      None
    );
  }

  #[test]
  fn extended_codes_map_to_kinds() {
    assert_eq!(classify(ffi::SQLITE_CONSTRAINT_UNIQUE), ConstraintKind::Unique);
    assert_eq!(
      classify(ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
      ConstraintKind::ForeignKey
    );
    assert_eq!(classify(ffi::SQLITE_CONSTRAINT_TRIGGER), ConstraintKind::Check);
    assert_eq!(classify(ffi::SQLITE_CONSTRAINT_NOTNULL), ConstraintKind::NotNull);
  }
}
