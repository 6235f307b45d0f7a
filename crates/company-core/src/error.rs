//! Error types for `company-core`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown person type: {0:?}")]
  UnknownPersonType(String),

  #[error("unknown customer tier: {0:?}")]
  UnknownTier(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The family of integrity rule a database rejected a statement for.
///
/// Backends classify the driver's violation report into one of these so
/// callers can react without matching on driver-specific codes.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintKind {
  Unique,
  ForeignKey,
  Check,
  NotNull,
  /// Anything else the engine reports as an integrity failure (for example a
  /// trigger that aborts the statement).
  Other,
}
