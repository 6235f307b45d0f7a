//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings and dates are `YYYY-MM-DD`. Enumerated
//! values are stored by name; the schema's CHECK constraints keep them valid.

use chrono::{DateTime, NaiveDate, Utc};
use company_core::{
  customer::{CustomerId, CustomerRecord, CustomerTier},
  employee::{EmployeeId, EmployeeRecord},
  person::{Person, PersonId, PersonType},
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `person` row (or any row carrying `p.*`).
pub struct RawPerson {
  pub person_id:     i32,
  pub name:          String,
  pub address:       Option<String>,
  pub phone:         Option<String>,
  pub email:         String,
  pub person_type:   String,
  pub created_at:    String,
  pub last_modified: String,
}

impl RawPerson {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:     row.get("person_id")?,
      name:          row.get("name")?,
      address:       row.get("address")?,
      phone:         row.get("phone")?,
      email:         row.get("email")?,
      person_type:   row.get("person_type")?,
      created_at:    row.get("created_at")?,
      last_modified: row.get("last_modified")?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:     PersonId(self.person_id),
      name:          self.name,
      address:       self.address,
      phone:         self.phone,
      email:         self.email,
      person_type:   PersonType::parse(&self.person_type)?,
      created_at:    decode_dt(&self.created_at)?,
      last_modified: decode_dt(&self.last_modified)?,
    })
  }
}

/// Raw values read from `v_customer_complete`.
pub struct RawCustomerRecord {
  pub person_id:         i32,
  pub name:              String,
  pub address:           Option<String>,
  pub phone:             Option<String>,
  pub email:             String,
  pub customer_id:       i32,
  pub loyalty_points:    i32,
  pub customer_tier:     String,
  pub registration_date: String,
}

impl RawCustomerRecord {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:         row.get("person_id")?,
      name:              row.get("name")?,
      address:           row.get("address")?,
      phone:             row.get("phone")?,
      email:             row.get("email")?,
      customer_id:       row.get("customer_id")?,
      loyalty_points:    row.get("loyalty_points")?,
      customer_tier:     row.get("customer_tier")?,
      registration_date: row.get("registration_date")?,
    })
  }

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
      registration_date: decode_date(&self.registration_date)?,
    })
  }
}

/// Raw values read from `v_employee_complete`.
pub struct RawEmployeeRecord {
  pub person_id:    i32,
  pub name:         String,
  pub address:      Option<String>,
  pub phone:        Option<String>,
  pub email:        String,
  pub employee_id:  i32,
  pub salary:       f64,
  pub department:   String,
  pub hire_date:    String,
  pub position:     Option<String>,
  pub manager_id:   Option<i32>,
  pub manager_name: Option<String>,
}

impl RawEmployeeRecord {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:    row.get("person_id")?,
      name:         row.get("name")?,
      address:      row.get("address")?,
      phone:        row.get("phone")?,
      email:        row.get("email")?,
      employee_id:  row.get("employee_id")?,
      salary:       row.get("salary")?,
      department:   row.get("department")?,
      hire_date:    row.get("hire_date")?,
      position:     row.get("position")?,
      manager_id:   row.get("manager_id")?,
      manager_name: row.get("manager_name")?,
    })
  }

  pub fn into_record(self) -> Result<EmployeeRecord> {
    Ok(EmployeeRecord {
      person_id:    PersonId(self.person_id),
      name:         self.name,
      address:      self.address,
      phone:        self.phone,
      email:        self.email,
      employee_id:  EmployeeId(self.employee_id),
      salary:       self.salary,
      department:   self.department,
      hire_date:    decode_date(&self.hire_date)?,
      position:     self.position,
      manager_id:   self.manager_id.map(EmployeeId),
      manager_name: self.manager_name,
    })
  }
}
