//! Employee — the staff subtype of [`Person`](crate::person::Person).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::person::PersonId;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EmployeeId(pub i32);

impl fmt::Display for EmployeeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Subtype-specific input to
/// [`crate::store::CompanyStore::create_employee`].
#[derive(Debug, Clone)]
pub struct NewEmployee {
  /// Must be positive.
  pub salary:     f64,
  pub department: String,
  pub position:   Option<String>,
  /// Another employee; cleared by the database if that employee is deleted.
  pub manager_id: Option<EmployeeId>,
  /// Defaults to the current date when `None`. Dates in the future are
  /// rejected by the database.
  pub hire_date:  Option<NaiveDate>,
}

impl NewEmployee {
  pub fn new(salary: f64, department: impl Into<String>) -> Self {
    Self {
      salary,
      department: department.into(),
      position: None,
      manager_id: None,
      hire_date: None,
    }
  }
}

/// Person ⋈ Employee ⟕ manager — one denormalized row per employee. This is
/// also the shape of the `v_employee_complete` view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
  pub person_id:    PersonId,
  pub name:         String,
  pub address:      Option<String>,
  pub phone:        Option<String>,
  pub email:        String,
  pub employee_id:  EmployeeId,
  pub salary:       f64,
  pub department:   String,
  pub hire_date:    NaiveDate,
  pub position:     Option<String>,
  pub manager_id:   Option<EmployeeId>,
  pub manager_name: Option<String>,
}

/// γ[department; COUNT, AVG, MIN, MAX, SUM](Employee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentStats {
  pub department:     String,
  pub employee_count: i64,
  pub avg_salary:     f64,
  pub min_salary:     f64,
  pub max_salary:     f64,
  pub total_salary:   f64,
}
