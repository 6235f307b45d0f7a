//! [`SqliteStore`] — the SQLite implementation of [`CompanyStore`].

use std::path::Path;

use company_core::{
  algebra::{Contact, CustomerOnly, Difference, DualRole, EmployeeOnly, SelectedCustomer},
  customer::{CustomerId, CustomerRecord, CustomerTier, NewCustomer},
  employee::{DepartmentStats, EmployeeId, EmployeeRecord, NewEmployee},
  person::{NewPerson, Person, PersonId, PersonUpdate},
  sample::SAMPLE_DATA,
  store::CompanyStore,
};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use crate::{
  Result,
  encode::{RawCustomerRecord, RawEmployeeRecord, RawPerson, encode_date},
  schema::SCHEMA,
};

// ─── Statements shared by several operations ─────────────────────────────────

const INSERT_PERSON: &str = "
INSERT INTO person (name, address, phone, email, person_type)
VALUES (?1, ?2, ?3, ?4, ?5)
RETURNING person_id";

fn insert_person(conn: &rusqlite::Connection, p: &NewPerson) -> rusqlite::Result<i32> {
  conn.query_row(
    INSERT_PERSON,
    rusqlite::params![p.name, p.address, p.phone, p.email, p.person_type.as_ref()],
    |row| row.get(0),
  )
}

fn collect<T>(
  stmt: &mut rusqlite::Statement<'_>,
  params: impl rusqlite::Params,
  map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
  stmt.query_map(params, map)?.collect()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A company directory backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.apply_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.apply_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection, waiting for queued calls to finish.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn query_persons(&self, sql: &'static str) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        Ok(collect(&mut stmt, [], RawPerson::from_row)?)
      })
      .await?;
    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

// ─── CompanyStore impl ───────────────────────────────────────────────────────

impl CompanyStore for SqliteStore {
  type Error = crate::Error;

  // ── Schema ────────────────────────────────────────────────────────────────

  async fn apply_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    info!("sqlite schema applied");
    Ok(())
  }

  async fn load_sample_data(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(SAMPLE_DATA)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    info!("sample data loaded");
    Ok(())
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn create_person(&self, person: NewPerson) -> Result<PersonId> {
    let id = self
      .conn
      .call(move |conn| Ok(insert_person(conn, &person)?))
      .await?;
    debug!(person_id = id, "person created");
    Ok(PersonId(id))
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT * FROM person WHERE person_id = ?1",
              rusqlite::params![id.0],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    self
      .query_persons("SELECT * FROM person ORDER BY name, person_id")
      .await
  }

  async fn update_person(&self, id: PersonId, update: PersonUpdate) -> Result<bool> {
    if update.is_empty() {
      return Ok(false);
    }

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE person SET
             name        = COALESCE(?1, name),
             address     = COALESCE(?2, address),
             phone       = COALESCE(?3, phone),
             email       = COALESCE(?4, email),
             person_type = COALESCE(?5, person_type)
           WHERE person_id = ?6",
          rusqlite::params![
            update.name,
            update.address,
            update.phone,
            update.email,
            update.person_type.as_ref().map(AsRef::<str>::as_ref),
            id.0,
          ],
        )?)
      })
      .await?;

    debug!(person_id = id.0, changed, "person updated");
    Ok(changed > 0)
  }

  async fn delete_person(&self, id: PersonId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM person WHERE person_id = ?1",
          rusqlite::params![id.0],
        )?)
      })
      .await?;

    debug!(person_id = id.0, deleted, "person deleted");
    Ok(deleted > 0)
  }

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn create_customer(
    &self,
    person: NewPerson,
    customer: NewCustomer,
  ) -> Result<(PersonId, CustomerId)> {
    let (person_id, customer_id) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = insert_person(&tx, &person)?;
        let customer_id: i32 = tx.query_row(
          "INSERT INTO customer (person_id, loyalty_points, customer_tier)
           VALUES (?1, ?2, ?3)
           RETURNING customer_id",
          rusqlite::params![
            person_id,
            customer.loyalty_points,
            customer.customer_tier.as_ref(),
          ],
          |row| row.get(0),
        )?;
        tx.commit()?;
        Ok((person_id, customer_id))
      })
      .await?;

    debug!(person_id, customer_id, "customer created");
    Ok((PersonId(person_id), CustomerId(customer_id)))
  }

  async fn get_customer_complete(&self, id: CustomerId) -> Result<Option<CustomerRecord>> {
    let raw: Option<RawCustomerRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT
                 p.person_id, p.name, p.address, p.phone, p.email,
                 c.customer_id, c.loyalty_points, c.customer_tier, c.registration_date
               FROM person p
               INNER JOIN customer c ON c.person_id = p.person_id
               WHERE c.customer_id = ?1",
              rusqlite::params![id.0],
              RawCustomerRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCustomerRecord::into_record).transpose()
  }

  async fn list_customers(&self) -> Result<Vec<CustomerRecord>> {
    let raws: Vec<RawCustomerRecord> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT * FROM v_customer_complete ORDER BY name, customer_id")?;
        Ok(collect(&mut stmt, [], RawCustomerRecord::from_row)?)
      })
      .await?;

    raws.into_iter().map(RawCustomerRecord::into_record).collect()
  }

  async fn customers_by_tier(&self, tier: CustomerTier) -> Result<Vec<CustomerRecord>> {
    let raws: Vec<RawCustomerRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT * FROM v_customer_complete
           WHERE customer_tier = ?1
           ORDER BY loyalty_points DESC",
        )?;
        Ok(collect(
          &mut stmt,
          rusqlite::params![tier.as_ref()],
          RawCustomerRecord::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawCustomerRecord::into_record).collect()
  }

  async fn add_loyalty_points(&self, id: CustomerId, delta: i32) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE customer
           SET loyalty_points = loyalty_points + ?1
           WHERE customer_id = ?2",
          rusqlite::params![delta, id.0],
        )?)
      })
      .await?;

    debug!(customer_id = id.0, delta, changed, "loyalty points adjusted");
    Ok(changed > 0)
  }

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn create_employee(
    &self,
    person: NewPerson,
    employee: NewEmployee,
  ) -> Result<(PersonId, EmployeeId)> {
    let hire_date = employee.hire_date.map(encode_date);

    let (person_id, employee_id) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = insert_person(&tx, &person)?;
        let employee_id: i32 = tx.query_row(
          "INSERT INTO employee
             (person_id, salary, department, hire_date, position, manager_id)
           VALUES (?1, ?2, ?3, COALESCE(?4, date('now')), ?5, ?6)
           RETURNING employee_id",
          rusqlite::params![
            person_id,
            employee.salary,
            employee.department,
            hire_date,
            employee.position,
            employee.manager_id.map(|m| m.0),
          ],
          |row| row.get(0),
        )?;
        tx.commit()?;
        Ok((person_id, employee_id))
      })
      .await?;

    debug!(person_id, employee_id, "employee created");
    Ok((PersonId(person_id), EmployeeId(employee_id)))
  }

  async fn get_employee_complete(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>> {
    let raw: Option<RawEmployeeRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT
                 p.person_id, p.name, p.address, p.phone, p.email,
                 e.employee_id, e.salary, e.department, e.hire_date, e.position,
                 e.manager_id, mp.name AS manager_name
               FROM person p
               INNER JOIN employee e ON e.person_id = p.person_id
               LEFT JOIN employee m  ON m.employee_id = e.manager_id
               LEFT JOIN person mp   ON mp.person_id = m.person_id
               WHERE e.employee_id = ?1",
              rusqlite::params![id.0],
              RawEmployeeRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEmployeeRecord::into_record).transpose()
  }

  async fn employees_by_department(&self, department: &str) -> Result<Vec<EmployeeRecord>> {
    let department = department.to_owned();

    let raws: Vec<RawEmployeeRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT * FROM v_employee_complete
           WHERE department = ?1
           ORDER BY name, employee_id",
        )?;
        Ok(collect(
          &mut stmt,
          rusqlite::params![department],
          RawEmployeeRecord::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawEmployeeRecord::into_record).collect()
  }

  async fn department_statistics(&self) -> Result<Vec<DepartmentStats>> {
    let stats = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             department,
             COUNT(*)    AS employee_count,
             AVG(salary) AS avg_salary,
             MIN(salary) AS min_salary,
             MAX(salary) AS max_salary,
             SUM(salary) AS total_salary
           FROM employee
           GROUP BY department
           ORDER BY avg_salary DESC",
        )?;
        Ok(collect(&mut stmt, [], |row| {
          Ok(DepartmentStats {
            department:     row.get("department")?,
            employee_count: row.get("employee_count")?,
            avg_salary:     row.get("avg_salary")?,
            min_salary:     row.get("min_salary")?,
            max_salary:     row.get("max_salary")?,
            total_salary:   row.get("total_salary")?,
          })
        })?)
      })
      .await?;

    Ok(stats)
  }

  // ── Relational algebra ────────────────────────────────────────────────────

  async fn demonstrate_selection(&self, min_loyalty: i32) -> Result<Vec<SelectedCustomer>> {
    let raws: Vec<(String, String, i32, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.name, p.email, c.loyalty_points, c.customer_tier
           FROM person p
           INNER JOIN customer c ON c.person_id = p.person_id
           WHERE c.loyalty_points >= ?1
           ORDER BY c.loyalty_points DESC",
        )?;
        Ok(collect(&mut stmt, rusqlite::params![min_loyalty], |row| {
          Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?)
      })
      .await?;

    raws
      .into_iter()
      .map(|(name, email, loyalty_points, tier)| {
        Ok(SelectedCustomer {
          name,
          email,
          loyalty_points,
          customer_tier: CustomerTier::parse(&tier)?,
        })
      })
      .collect()
  }

  async fn demonstrate_projection(&self) -> Result<Vec<String>> {
    let departments = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT DISTINCT department FROM employee ORDER BY department")?;
        Ok(collect(&mut stmt, [], |row| row.get(0))?)
      })
      .await?;

    Ok(departments)
  }

  async fn demonstrate_union(&self) -> Result<Vec<Contact>> {
    let contacts = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT p.name, p.phone, p.email
           FROM person p
           INNER JOIN customer c ON c.person_id = p.person_id
           UNION
           SELECT p.name, p.phone, p.email
           FROM person p
           INNER JOIN employee e ON e.person_id = p.person_id
           ORDER BY name, email",
        )?;
        Ok(collect(&mut stmt, [], |row| {
          Ok(Contact {
            name:  row.get(0)?,
            phone: row.get(1)?,
            email: row.get(2)?,
          })
        })?)
      })
      .await?;

    Ok(contacts)
  }

  async fn demonstrate_intersection(&self) -> Result<Vec<DualRole>> {
    let raws: Vec<(RawPerson, i32, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
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
        )?;
        Ok(collect(&mut stmt, [], |row| {
          Ok((
            RawPerson::from_row(row)?,
            row.get("loyalty_points")?,
            row.get("department")?,
          ))
        })?)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, loyalty_points, department)| {
        Ok(DualRole {
          person: raw.into_person()?,
          loyalty_points,
          department,
        })
      })
      .collect()
  }

  async fn demonstrate_difference(&self) -> Result<Difference> {
    type Raw = (Vec<(RawPerson, i32)>, Vec<(RawPerson, String, f64)>);

    let (customers, employees): Raw = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;

        let customers = {
          let mut stmt = tx.prepare(
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
          )?;
          collect(&mut stmt, [], |row| {
            Ok((RawPerson::from_row(row)?, row.get("loyalty_points")?))
          })?
        };

        let employees = {
          let mut stmt = tx.prepare(
            "WITH employees_only AS (
               SELECT person_id FROM employee
               EXCEPT
               SELECT person_id FROM customer
             )
             SELECT p.*, e.department, e.salary
             FROM employees_only d
             INNER JOIN person p   ON p.person_id = d.person_id
             INNER JOIN employee e ON e.person_id = d.person_id
             ORDER BY p.person_id",
          )?;
          collect(&mut stmt, [], |row| {
            Ok((
              RawPerson::from_row(row)?,
              row.get("department")?,
              row.get("salary")?,
            ))
          })?
        };

        tx.commit()?;
        Ok((customers, employees))
      })
      .await?;

    let customers_only = customers
      .into_iter()
      .map(|(raw, loyalty_points)| {
        Ok(CustomerOnly { person: raw.into_person()?, loyalty_points })
      })
      .collect::<Result<_>>()?;

    let employees_only = employees
      .into_iter()
      .map(|(raw, department, salary)| {
        Ok(EmployeeOnly { person: raw.into_person()?, department, salary })
      })
      .collect::<Result<_>>()?;

    Ok(Difference { customers_only, employees_only })
  }
}
