//! The `CompanyStore` trait.
//!
//! The trait is implemented by storage backends (`company-store-postgres`,
//! `company-store-sqlite`). Each method issues one fixed, parameterized SQL
//! statement, or a fixed sequence of them inside a single transaction.
//! Integrity rules (unique email, enumerated values, positive salary, hire
//! date not in the future, cascades) are enforced by the database; backends
//! report violations, they never pre-check them.

use std::future::Future;

use crate::{
  algebra::{Contact, Difference, DualRole, SelectedCustomer},
  customer::{CustomerId, CustomerRecord, CustomerTier, NewCustomer},
  employee::{DepartmentStats, EmployeeId, EmployeeRecord, NewEmployee},
  person::{NewPerson, Person, PersonId, PersonUpdate},
};

/// Abstraction over a company-directory backend.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait CompanyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Create tables, constraints, indexes, the `last_modified` trigger and
  /// both views. Safe to run against an already-initialised database.
  fn apply_schema(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert the sample data set from [`crate::sample::SAMPLE_DATA`].
  /// Rows that already exist are left alone.
  fn load_sample_data(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Insert a person and return the generated id. Fails on a duplicate or
  /// malformed email.
  fn create_person(
    &self,
    person: NewPerson,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All persons, ordered by name.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Apply the set fields of `update`. Returns `false` if the person does not
  /// exist or `update` is empty.
  fn update_person(
    &self,
    id: PersonId,
    update: PersonUpdate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a person and, by cascade, its customer and employee rows.
  /// Returns `false` if the person does not exist.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Customers ─────────────────────────────────────────────────────────

  /// Insert the person and its customer row in one transaction.
  fn create_customer(
    &self,
    person: NewPerson,
    customer: NewCustomer,
  ) -> impl Future<Output = Result<(PersonId, CustomerId), Self::Error>> + Send + '_;

  /// Person ⋈ Customer for one customer, or `None`.
  fn get_customer_complete(
    &self,
    id: CustomerId,
  ) -> impl Future<Output = Result<Option<CustomerRecord>, Self::Error>> + Send + '_;

  /// Every customer, ordered by name.
  fn list_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<CustomerRecord>, Self::Error>> + Send + '_;

  /// σ[customer_tier = tier](Person ⋈ Customer), highest loyalty first.
  fn customers_by_tier(
    &self,
    tier: CustomerTier,
  ) -> impl Future<Output = Result<Vec<CustomerRecord>, Self::Error>> + Send + '_;

  /// Add `delta` (possibly negative) to a customer's points. Returns `false`
  /// if the customer does not exist; a negative balance is a check violation.
  fn add_loyalty_points(
    &self,
    id: CustomerId,
    delta: i32,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Employees ─────────────────────────────────────────────────────────

  /// Insert the person and its employee row in one transaction.
  fn create_employee(
    &self,
    person: NewPerson,
    employee: NewEmployee,
  ) -> impl Future<Output = Result<(PersonId, EmployeeId), Self::Error>> + Send + '_;

  /// Person ⋈ Employee ⟕ manager for one employee, or `None`.
  fn get_employee_complete(
    &self,
    id: EmployeeId,
  ) -> impl Future<Output = Result<Option<EmployeeRecord>, Self::Error>> + Send + '_;

  /// Employees of one department, ordered by name.
  fn employees_by_department<'a>(
    &'a self,
    department: &'a str,
  ) -> impl Future<Output = Result<Vec<EmployeeRecord>, Self::Error>> + Send + 'a;

  /// Salary aggregates per department, highest average first.
  fn department_statistics(
    &self,
  ) -> impl Future<Output = Result<Vec<DepartmentStats>, Self::Error>> + Send + '_;

  // ── Relational algebra ────────────────────────────────────────────────

  /// σ[loyalty_points ≥ min_loyalty](Person ⋈ Customer), highest first.
  fn demonstrate_selection(
    &self,
    min_loyalty: i32,
  ) -> impl Future<Output = Result<Vec<SelectedCustomer>, Self::Error>> + Send + '_;

  /// π[department](Employee): distinct department names, sorted.
  fn demonstrate_projection(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// π[name, phone, email](Person ⋈ Customer) ∪
  /// π[name, phone, email](Person ⋈ Employee), without duplicates.
  fn demonstrate_union(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// π[person_id](Customer) ∩ π[person_id](Employee), ordered by person id.
  fn demonstrate_intersection(
    &self,
  ) -> impl Future<Output = Result<Vec<DualRole>, Self::Error>> + Send + '_;

  /// π[person_id](Customer) − π[person_id](Employee) and the reverse.
  fn demonstrate_difference(
    &self,
  ) -> impl Future<Output = Result<Difference, Self::Error>> + Send + '_;
}
