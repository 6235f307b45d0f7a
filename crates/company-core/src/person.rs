//! Person — the supertype every customer and employee extends.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Database-generated identifier of a `person` row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i32);

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Discriminator ───────────────────────────────────────────────────────────

/// Which subtype(s) a person is expected to hold. Stored as the variant name;
/// the database rejects anything outside this set.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::EnumIter,
)]
pub enum PersonType {
  Customer,
  Employee,
  Both,
}

impl PersonType {
  /// Parse the stored column value.
  pub fn parse(s: &str) -> Result<Self, Error> {
    s.parse().map_err(|_| Error::UnknownPersonType(s.to_owned()))
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A row of the `person` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:     PersonId,
  pub name:          String,
  pub address:       Option<String>,
  pub phone:         Option<String>,
  pub email:         String,
  pub person_type:   PersonType,
  pub created_at:    DateTime<Utc>,
  /// Maintained by the database trigger; never written by callers.
  pub last_modified: DateTime<Utc>,
}

/// Input to [`crate::store::CompanyStore::create_person`]. Identifier and
/// timestamps are assigned by the database.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub name:        String,
  pub address:     Option<String>,
  pub phone:       Option<String>,
  pub email:       String,
  pub person_type: PersonType,
}

impl NewPerson {
  /// Convenience constructor with address and phone left empty.
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    person_type: PersonType,
  ) -> Self {
    Self {
      name: name.into(),
      address: None,
      phone: None,
      email: email.into(),
      person_type,
    }
  }

  pub fn with_address(mut self, address: impl Into<String>) -> Self {
    self.address = Some(address.into());
    self
  }

  pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
    self.phone = Some(phone.into());
    self
  }
}

/// A partial update of a person. Unset fields are left untouched.
///
/// `address` and `phone` can only be replaced, not cleared.
#[derive(Debug, Clone, Default)]
pub struct PersonUpdate {
  pub name:        Option<String>,
  pub address:     Option<String>,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub person_type: Option<PersonType>,
}

impl PersonUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.address.is_none()
      && self.phone.is_none()
      && self.email.is_none()
      && self.person_type.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn person_type_uses_capitalised_names() {
    assert_eq!(PersonType::Both.as_ref(), "Both");
    assert_eq!(PersonType::parse("Employee").unwrap(), PersonType::Employee);
    assert!(matches!(
      PersonType::parse("employee"),
      Err(Error::UnknownPersonType(s)) if s == "employee"
    ));
  }

  #[test]
  fn default_update_is_empty() {
    assert!(PersonUpdate::default().is_empty());
    let update = PersonUpdate {
      phone: Some("555-9999".into()),
      ..Default::default()
    };
    assert!(!update.is_empty());
  }

  #[test]
  fn person_id_serialises_as_bare_integer() {
    assert_eq!(serde_json::to_string(&PersonId(7)).unwrap(), "7");
  }
}
