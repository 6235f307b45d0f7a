//! [`PgStore`] — the PostgreSQL implementation of [`CompanyStore`].

use company_core::{
  algebra::{Contact, Difference, DualRole, SelectedCustomer},
  customer::{CustomerId, CustomerRecord, CustomerTier, NewCustomer},
  employee::{DepartmentStats, EmployeeId, EmployeeRecord, NewEmployee},
  person::{NewPerson, Person, PersonId, PersonUpdate},
  sample::SAMPLE_DATA,
  store::CompanyStore,
};
use sqlx::{PgExecutor, PgPool, postgres::PgConnectOptions};
use tracing::{debug, info};

use crate::{
  Result,
  pool::{create_pool, create_pool_with_options},
  rows::{
    CustomerOnlyRow, CustomerRow, DepartmentStatsRow, DualRoleRow, EmployeeOnlyRow,
    EmployeeRow, PersonRow, SelectedCustomerRow,
  },
  schema::SCHEMA,
};

// ─── Statements shared by several operations ─────────────────────────────────

async fn insert_person<'e>(
  executor: impl PgExecutor<'e>,
  p: &NewPerson,
) -> sqlx::Result<i32> {
  sqlx::query_scalar(
    "INSERT INTO person (name, address, phone, email, person_type)
     VALUES ($1, $2, $3, $4, $5)
     RETURNING person_id",
  )
  .bind(&p.name)
  .bind(p.address.as_deref())
  .bind(p.phone.as_deref())
  .bind(&p.email)
  .bind(p.person_type.as_ref())
  .fetch_one(executor)
  .await
}

const CUSTOMER_COLUMNS: &str = "
  person_id, name, address, phone, email,
  customer_id, loyalty_points, customer_tier, registration_date";

const EMPLOYEE_COLUMNS: &str = "
  person_id, name, address, phone, email,
  employee_id, salary::float8 AS salary, department, hire_date, position,
  manager_id, manager_name";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A company directory backed by a PostgreSQL connection pool.
///
/// Cloning is cheap — the pool is reference-counted.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  /// Connect with a `postgres://` URL. The schema is not applied; call
  /// [`CompanyStore::apply_schema`] when the database may be empty.
  pub async fn connect(database_url: &str) -> Result<Self> {
    Ok(Self { pool: create_pool(database_url).await? })
  }

  pub async fn connect_with(
    options: PgConnectOptions,
    max_connections: u32,
  ) -> Result<Self> {
    Ok(Self {
      pool: create_pool_with_options(options, max_connections).await?,
    })
  }

  pub fn pool(&self) -> &PgPool { &self.pool }

  /// Close every pooled connection, waiting for checked-out ones to return.
  pub async fn close(&self) { self.pool.close().await }
}

// ─── CompanyStore impl ───────────────────────────────────────────────────────

impl CompanyStore for PgStore {
  type Error = crate::Error;

  // ── Schema ────────────────────────────────────────────────────────────────

  async fn apply_schema(&self) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
    info!("postgres schema applied");
    Ok(())
  }

  async fn load_sample_data(&self) -> Result<()> {
    // A multi-statement simple query runs as one implicit transaction.
    sqlx::raw_sql(SAMPLE_DATA).execute(&self.pool).await?;
    info!("sample data loaded");
    Ok(())
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn create_person(&self, person: NewPerson) -> Result<PersonId> {
    let id = insert_person(&self.pool, &person).await?;
    debug!(person_id = id, "person created");
    Ok(PersonId(id))
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let row: Option<PersonRow> =
      sqlx::query_as("SELECT * FROM person WHERE person_id = $1")
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

    row.map(PersonRow::into_person).transpose()
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let rows: Vec<PersonRow> =
      sqlx::query_as("SELECT * FROM person ORDER BY name, person_id")
        .fetch_all(&self.pool)
        .await?;

    rows.into_iter().map(PersonRow::into_person).collect()
  }

  async fn update_person(&self, id: PersonId, update: PersonUpdate) -> Result<bool> {
    if update.is_empty() {
      return Ok(false);
    }

    let result = sqlx::query(
      "UPDATE person SET
         name        = COALESCE($1, name),
         address     = COALESCE($2, address),
         phone       = COALESCE($3, phone),
         email       = COALESCE($4, email),
         person_type = COALESCE($5, person_type)
       WHERE person_id = $6",
    )
    .bind(update.name.as_deref())
    .bind(update.address.as_deref())
    .bind(update.phone.as_deref())
    .bind(update.email.as_deref())
    .bind(update.person_type.as_ref().map(AsRef::<str>::as_ref))
    .bind(id.0)
    .execute(&self.pool)
    .await?;

    let changed = result.rows_affected();
    debug!(person_id = id.0, changed, "person updated");
    Ok(changed > 0)
  }

  async fn delete_person(&self, id: PersonId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM person WHERE person_id = $1")
      .bind(id.0)
      .execute(&self.pool)
      .await?;

    let deleted = result.rows_affected();
    debug!(person_id = id.0, deleted, "person deleted");
    Ok(deleted > 0)
  }

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn create_customer(
    &self,
    person: NewPerson,
    customer: NewCustomer,
  ) -> Result<(PersonId, CustomerId)> {
    let mut tx = self.pool.begin().await?;

    let person_id = insert_person(&mut *tx, &person).await?;
    let customer_id: i32 = sqlx::query_scalar(
      "INSERT INTO customer (person_id, loyalty_points, customer_tier)
       VALUES ($1, $2, $3)
       RETURNING customer_id",
    )
    .bind(person_id)
    .bind(customer.loyalty_points)
    .bind(customer.customer_tier.as_ref())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    debug!(person_id, customer_id, "customer created");
    Ok((PersonId(person_id), CustomerId(customer_id)))
  }

  async fn get_customer_complete(&self, id: CustomerId) -> Result<Option<CustomerRecord>> {
    let row: Option<CustomerRow> = sqlx::query_as(
      "SELECT
         p.person_id, p.name, p.address, p.phone, p.email,
         c.customer_id, c.loyalty_points, c.customer_tier, c.registration_date
       FROM person p
       INNER JOIN customer c ON c.person_id = p.person_id
       WHERE c.customer_id = $1",
    )
    .bind(id.0)
    .fetch_optional(&self.pool)
    .await?;

    row.map(CustomerRow::into_record).transpose()
  }

  async fn list_customers(&self) -> Result<Vec<CustomerRecord>> {
    let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
      "SELECT {CUSTOMER_COLUMNS} FROM v_customer_complete ORDER BY name, customer_id"
    ))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(CustomerRow::into_record).collect()
  }

  async fn customers_by_tier(&self, tier: CustomerTier) -> Result<Vec<CustomerRecord>> {
    let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
      "SELECT {CUSTOMER_COLUMNS} FROM v_customer_complete
       WHERE customer_tier = $1
       ORDER BY loyalty_points DESC"
    ))
    .bind(tier.as_ref())
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(CustomerRow::into_record).collect()
  }

  async fn add_loyalty_points(&self, id: CustomerId, delta: i32) -> Result<bool> {
    let result = sqlx::query(
      "UPDATE customer
       SET loyalty_points = loyalty_points + $1
       WHERE customer_id = $2",
    )
    .bind(delta)
    .bind(id.0)
    .execute(&self.pool)
    .await?;

    let changed = result.rows_affected();
    debug!(customer_id = id.0, delta, changed, "loyalty points adjusted");
    Ok(changed > 0)
  }

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn create_employee(
    &self,
    person: NewPerson,
    employee: NewEmployee,
  ) -> Result<(PersonId, EmployeeId)> {
    let mut tx = self.pool.begin().await?;

    let person_id = insert_person(&mut *tx, &person).await?;
    let employee_id: i32 = sqlx::query_scalar(
      "INSERT INTO employee
         (person_id, salary, department, hire_date, position, manager_id)
       VALUES ($1, $2::numeric, $3, COALESCE($4, CURRENT_DATE), $5, $6)
       RETURNING employee_id",
    )
    .bind(person_id)
    .bind(employee.salary)
    .bind(&employee.department)
    .bind(employee.hire_date)
    .bind(employee.position.as_deref())
    .bind(employee.manager_id.map(|m| m.0))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    debug!(person_id, employee_id, "employee created");
    Ok((PersonId(person_id), EmployeeId(employee_id)))
  }

  async fn get_employee_complete(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>> {
    let row: Option<EmployeeRow> = sqlx::query_as(
      "SELECT
         p.person_id, p.name, p.address, p.phone, p.email,
         e.employee_id, e.salary::float8 AS salary, e.department, e.hire_date,
         e.position, e.manager_id, mp.name AS manager_name
       FROM person p
       INNER JOIN employee e ON e.person_id = p.person_id
       LEFT JOIN employee m  ON m.employee_id = e.manager_id
       LEFT JOIN person mp   ON mp.person_id = m.person_id
       WHERE e.employee_id = $1",
    )
    .bind(id.0)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(EmployeeRow::into_record))
  }

  async fn employees_by_department(&self, department: &str) -> Result<Vec<EmployeeRecord>> {
    let rows: Vec<EmployeeRow> = sqlx::query_as(&format!(
      "SELECT {EMPLOYEE_COLUMNS} FROM v_employee_complete
       WHERE department = $1
       ORDER BY name, employee_id"
    ))
    .bind(department)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(EmployeeRow::into_record).collect())
  }

  async fn department_statistics(&self) -> Result<Vec<DepartmentStats>> {
    let rows: Vec<DepartmentStatsRow> = sqlx::query_as(
      "SELECT
         department,
         COUNT(*)            AS employee_count,
         AVG(salary)::float8 AS avg_salary,
         MIN(salary)::float8 AS min_salary,
         MAX(salary)::float8 AS max_salary,
         SUM(salary)::float8 AS total_salary
       FROM employee
       GROUP BY department
       ORDER BY avg_salary DESC",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(DepartmentStats::from).collect())
  }

  // ── Relational algebra ────────────────────────────────────────────────────

  async fn demonstrate_selection(&self, min_loyalty: i32) -> Result<Vec<SelectedCustomer>> {
    let rows: Vec<SelectedCustomerRow> = sqlx::query_as(
      "SELECT p.name, p.email, c.loyalty_points, c.customer_tier
       FROM person p
       INNER JOIN customer c ON c.person_id = p.person_id
       WHERE c.loyalty_points >= $1
       ORDER BY c.loyalty_points DESC",
    )
    .bind(min_loyalty)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(SelectedCustomerRow::into_selected).collect()
  }

  async fn demonstrate_projection(&self) -> Result<Vec<String>> {
    let departments =
      sqlx::query_scalar("SELECT DISTINCT department FROM employee ORDER BY department")
        .fetch_all(&self.pool)
        .await?;

    Ok(departments)
  }

  async fn demonstrate_union(&self) -> Result<Vec<Contact>> {
    let rows: Vec<(String, Option<String>, String)> = sqlx::query_as(
      "SELECT p.name, p.phone, p.email
       FROM person p
       INNER JOIN customer c ON c.person_id = p.person_id
       UNION
       SELECT p.name, p.phone, p.email
       FROM person p
       INNER JOIN employee e ON e.person_id = p.person_id
       ORDER BY name, email",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(
      rows
        .into_iter()
        .map(|(name, phone, email)| Contact { name, phone, email })
        .collect(),
    )
  }

  async fn demonstrate_intersection(&self) -> Result<Vec<DualRole>> {
    let rows: Vec<DualRoleRow> = sqlx::query_as(
      "WITH both_roles AS (
         SELECT person_id FROM customer
         INTERSECT
         SELECT person_id FROM employee
       )
       SELECT p.*, c.loyalty_points, e.department
       FROM both_roles b
       INNER JOIN person p   ON p.person_id = b.person_id
       INNER JOIN customer c ON c.person_id = b.person_id
       INNER JOIN employee e ON e.person_id = b.person_id
       ORDER BY p.person_id",
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(DualRoleRow::into_dual_role).collect()
  }

  async fn demonstrate_difference(&self) -> Result<Difference> {
    // Both directions must read the same snapshot.
    let mut tx = self.pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
      .execute(&mut *tx)
      .await?;

    let customers: Vec<CustomerOnlyRow> = sqlx::query_as(
      "WITH customers_only AS (
         SELECT person_id FROM customer
         EXCEPT
         SELECT person_id FROM employee
       )
       SELECT p.*, c.loyalty_points
       FROM customers_only d
       INNER JOIN person p   ON p.person_id = d.person_id
       INNER JOIN customer c ON c.person_id = d.person_id
       ORDER BY p.person_id",
    )
    .fetch_all(&mut *tx)
    .await?;

    let employees: Vec<EmployeeOnlyRow> = sqlx::query_as(
      "WITH employees_only AS (
         SELECT person_id FROM employee
         EXCEPT
         SELECT person_id FROM customer
       )
       SELECT p.*, e.department, e.salary::float8 AS salary
       FROM employees_only d
       INNER JOIN person p   ON p.person_id = d.person_id
       INNER JOIN employee e ON e.person_id = d.person_id
       ORDER BY p.person_id",
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Difference {
      customers_only: customers
        .into_iter()
        .map(CustomerOnlyRow::into_customer_only)
        .collect::<Result<_>>()?,
      employees_only: employees
        .into_iter()
        .map(EmployeeOnlyRow::into_employee_only)
        .collect::<Result<_>>()?,
    })
  }
}
