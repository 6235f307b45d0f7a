//! Customer — the loyalty-programme subtype of [`Person`](crate::person::Person).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, person::PersonId};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CustomerId(pub i32);

impl fmt::Display for CustomerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Loyalty tier. Ordered from lowest to highest.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::EnumIter,
)]
pub enum CustomerTier {
  #[default]
  Bronze,
  Silver,
  Gold,
  Platinum,
}

impl CustomerTier {
  pub fn parse(s: &str) -> Result<Self, Error> {
    s.parse().map_err(|_| Error::UnknownTier(s.to_owned()))
  }
}

/// Subtype-specific input to
/// [`crate::store::CompanyStore::create_customer`].
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
  pub loyalty_points: i32,
  pub customer_tier:  CustomerTier,
}

/// Person ⋈ Customer — one denormalized row per customer. This is also the
/// shape of the `v_customer_complete` view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
  pub person_id:         PersonId,
  pub name:              String,
  pub address:           Option<String>,
  pub phone:             Option<String>,
  pub email:             String,
  pub customer_id:       CustomerId,
  pub loyalty_points:    i32,
  pub customer_tier:     CustomerTier,
  pub registration_date: NaiveDate,
}
