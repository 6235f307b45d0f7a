//! Result rows of the relational-algebra demonstrations.
//!
//! Every operator runs inside the database as a single SQL statement; these
//! types only describe the relation each statement returns.

use serde::{Deserialize, Serialize};

use crate::{
  customer::CustomerTier,
  person::{Person, PersonId},
};

/// Loyalty threshold used when the caller does not pick one.
pub const DEFAULT_MIN_LOYALTY: i32 = 1000;

/// σ[loyalty_points ≥ min](Person ⋈ Customer), projected for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedCustomer {
  pub name:           String,
  pub email:          String,
  pub loyalty_points: i32,
  pub customer_tier:  CustomerTier,
}

/// One tuple of π[name, phone, email] over customers ∪ employees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
  pub name:  String,
  pub phone: Option<String>,
  pub email: String,
}

/// A person present in both π[person_id](Customer) and π[person_id](Employee).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualRole {
  pub person:         Person,
  pub loyalty_points: i32,
  pub department:     String,
}

/// A person in π[person_id](Customer) − π[person_id](Employee).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOnly {
  pub person:         Person,
  pub loyalty_points: i32,
}

/// A person in π[person_id](Employee) − π[person_id](Customer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeOnly {
  pub person:     Person,
  pub department: String,
  pub salary:     f64,
}

/// Both directions of the set difference between the two subtypes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Difference {
  pub customers_only: Vec<CustomerOnly>,
  pub employees_only: Vec<EmployeeOnly>,
}

impl Difference {
  pub fn customer_ids(&self) -> Vec<PersonId> {
    self.customers_only.iter().map(|c| c.person.person_id).collect()
  }

  pub fn employee_ids(&self) -> Vec<PersonId> {
    self.employees_only.iter().map(|e| e.person.person_id).collect()
  }
}
