//! Row shapes decoded by sqlx and their conversion into domain types.
//!
//! NUMERIC salary columns are cast to `float8` in the queries, so every
//! salary field here is `f64`.

use chrono::{DateTime, NaiveDate, Utc};
use company_core::{
  algebra::{CustomerOnly, DualRole, EmployeeOnly, SelectedCustomer},
  customer::{CustomerId, CustomerRecord, CustomerTier},
  employee::{DepartmentStats, EmployeeId, EmployeeRecord},
  person::{Person, PersonId, PersonType},
};
use sqlx::FromRow;

use crate::Result;

#[derive(Debug, FromRow)]
pub struct PersonRow {
  pub person_id:     i32,
  pub name:          String,
  pub address:       Option<String>,
  pub phone:         Option<String>,
  pub email:         String,
  pub person_type:   String,
  pub created_at:    DateTime<Utc>,
  pub last_modified: DateTime<Utc>,
}

impl PersonRow {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:     PersonId(self.person_id),
      name:          self.name,
      address:       self.address,
      phone:         self.phone,
      email:         self.email,
      person_type:   PersonType::parse(&self.person_type)?,
      created_at:    self.created_at,
      last_modified: self.last_modified,
    })
  }
}

#[derive(Debug, FromRow)]
pub struct CustomerRow {
  pub person_id:         i32,
  pub name:              String,
  pub address:           Option<String>,
  pub phone:             Option<String>,
  pub email:             String,
  pub customer_id:       i32,
  pub loyalty_points:    i32,
  pub customer_tier:     String,
  pub registration_date: NaiveDate,
}

impl CustomerRow {
  pub fn into_record(self) -> Result<CustomerRecord> {
    Ok(CustomerRecord {
      person_id:         PersonId(self.person_id),
      name:              self.name,
      address:           self.address,
      phone:             self.phone,
      email:             self.email,
      customer_id:       CustomerId(self.customer_id),
      loyalty_points:    self.loyalty_points,
      customer_tier:     CustomerTier::parse(&self.customer_tier)?,
      registration_date: self.registration_date,
    })
  }
}

#[derive(Debug, FromRow)]
pub struct EmployeeRow {
  pub person_id:    i32,
  pub name:         String,
  pub address:      Option<String>,
  pub phone:        Option<String>,
  pub email:        String,
  pub employee_id:  i32,
  pub salary:       f64,
  pub department:   String,
  pub hire_date:    NaiveDate,
  pub position:     Option<String>,
  pub manager_id:   Option<i32>,
  pub manager_name: Option<String>,
}

impl EmployeeRow {
  pub fn into_record(self) -> EmployeeRecord {
    EmployeeRecord {
      person_id:    PersonId(self.person_id),
      name:         self.name,
      address:      self.address,
      phone:        self.phone,
      email:        self.email,
      employee_id:  EmployeeId(self.employee_id),
      salary:       self.salary,
      department:   self.department,
      hire_date:    self.hire_date,
      position:     self.position,
      manager_id:   self.manager_id.map(EmployeeId),
      manager_name: self.manager_name,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct DepartmentStatsRow {
  pub department:     String,
  pub employee_count: i64,
  pub avg_salary:     f64,
  pub min_salary:     f64,
  pub max_salary:     f64,
  pub total_salary:   f64,
}

impl From<DepartmentStatsRow> for DepartmentStats {
  fn from(row: DepartmentStatsRow) -> Self {
    Self {
      department:     row.department,
      employee_count: row.employee_count,
      avg_salary:     row.avg_salary,
      min_salary:     row.min_salary,
      max_salary:     row.max_salary,
      total_salary:   row.total_salary,
    }
  }
}

// ─── Relational algebra rows ─────────────────────────────────────────────────

#[derive(Debug, FromRow)]
pub struct SelectedCustomerRow {
  pub name:           String,
  pub email:          String,
  pub loyalty_points: i32,
  pub customer_tier:  String,
}

impl SelectedCustomerRow {
  pub fn into_selected(self) -> Result<SelectedCustomer> {
    Ok(SelectedCustomer {
      name:           self.name,
      email:          self.email,
      loyalty_points: self.loyalty_points,
      customer_tier:  CustomerTier::parse(&self.customer_tier)?,
    })
  }
}

#[derive(Debug, FromRow)]
pub struct DualRoleRow {
  #[sqlx(flatten)]
  pub person:         PersonRow,
  pub loyalty_points: i32,
  pub department:     String,
}

impl DualRoleRow {
  pub fn into_dual_role(self) -> Result<DualRole> {
    Ok(DualRole {
      person:         self.person.into_person()?,
      loyalty_points: self.loyalty_points,
      department:     self.department,
    })
  }
}

#[derive(Debug, FromRow)]
pub struct CustomerOnlyRow {
  #[sqlx(flatten)]
  pub person:         PersonRow,
  pub loyalty_points: i32,
}

impl CustomerOnlyRow {
  pub fn into_customer_only(self) -> Result<CustomerOnly> {
    Ok(CustomerOnly {
      person:         self.person.into_person()?,
      loyalty_points: self.loyalty_points,
    })
  }
}

#[derive(Debug, FromRow)]
pub struct EmployeeOnlyRow {
  #[sqlx(flatten)]
  pub person:     PersonRow,
  pub department: String,
  pub salary:     f64,
}

impl EmployeeOnlyRow {
  pub fn into_employee_only(self) -> Result<EmployeeOnly> {
    Ok(EmployeeOnly {
      person:     self.person.into_person()?,
      department: self.department,
      salary:     self.salary,
    })
  }
}
