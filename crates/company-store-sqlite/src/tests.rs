//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use chrono::{Days, Utc};
use company_core::{
  ConstraintKind,
  algebra::DEFAULT_MIN_LOYALTY,
  customer::{CustomerId, CustomerTier, NewCustomer},
  employee::{EmployeeId, NewEmployee},
  person::{NewPerson, PersonId, PersonType, PersonUpdate},
  sample::DUAL_ROLE_EMAILS,
  store::CompanyStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn sample_store() -> SqliteStore {
  let s = store().await;
  s.load_sample_data().await.expect("sample data");
  s
}

fn person(name: &str, email: &str, kind: PersonType) -> NewPerson {
  NewPerson::new(name, email, kind)
    .with_address("100 Tech Street, Seattle, WA")
    .with_phone("555-0200")
}

fn customer(points: i32, tier: CustomerTier) -> NewCustomer {
  NewCustomer { loyalty_points: points, customer_tier: tier }
}

fn assert_constraint(err: Error, expected: ConstraintKind) {
  match err {
    Error::Constraint { kind, .. } => assert_eq!(kind, expected),
    other => panic!("expected {expected} violation, got {other:?}"),
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person() {
  let s = store().await;
  let id = s
    .create_person(person("Get Test", "get@example.com", PersonType::Employee))
    .await
    .unwrap();

  let fetched = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(fetched.person_id, id);
  assert_eq!(fetched.name, "Get Test");
  assert_eq!(fetched.email, "get@example.com");
  assert_eq!(fetched.person_type, PersonType::Employee);
  assert_eq!(fetched.phone.as_deref(), Some("555-0200"));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(PersonId(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_person(person("First", "dup@example.com", PersonType::Customer))
    .await
    .unwrap();

  let err = s
    .create_person(person("Second", "dup@example.com", PersonType::Customer))
    .await
    .unwrap_err();
  match err {
    Error::Constraint { kind, constraint, .. } => {
      assert_eq!(kind, ConstraintKind::Unique);
      assert_eq!(constraint.as_deref(), Some("person.email"));
    }
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
async fn malformed_email_is_rejected() {
  let s = store().await;
  let err = s
    .create_person(person("No Domain", "not-an-email", PersonType::Customer))
    .await
    .unwrap_err();
  assert_constraint(err, ConstraintKind::Check);
}

#[tokio::test]
async fn email_needs_single_at_and_alphabetic_tld() {
  let s = store().await;
  for email in ["a@@b.com", "a@b.c", "a@b..c", "a@.com", "a b@c.com", "a@b.c0m"] {
    let err = s
      .create_person(person("Bad Email", email, PersonType::Customer))
      .await
      .unwrap_err();
    assert_constraint(err, ConstraintKind::Check);
  }

  for email in ["first.last+tag@mail.example.co", "x_y%z@sub-domain.org"] {
    s.create_person(person("Good Email", email, PersonType::Customer))
      .await
      .unwrap();
  }
}

#[tokio::test]
async fn list_persons_is_ordered_by_name() {
  let s = sample_store().await;
  let persons = s.list_persons().await.unwrap();
  assert_eq!(persons.len(), 10);

  let names: Vec<_> = persons.iter().map(|p| p.name.as_str()).collect();
  let mut sorted = names.clone();
  sorted.sort();
  assert_eq!(names, sorted);
}

#[tokio::test]
async fn update_person_changes_fields_and_refreshes_last_modified() {
  let s = store().await;
  let id = s
    .create_person(person("Update Test", "update@example.com", PersonType::Customer))
    .await
    .unwrap();
  let before = s.get_person(id).await.unwrap().unwrap();

  tokio::time::sleep(std::time::Duration::from_millis(20)).await;

  let changed = s
    .update_person(id, PersonUpdate {
      name: Some("Updated Name".into()),
      phone: Some("555-9999".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(changed);

  let after = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(after.name, "Updated Name");
  assert_eq!(after.phone.as_deref(), Some("555-9999"));
  assert_eq!(after.address, before.address);
  assert_eq!(after.created_at, before.created_at);
  assert!(after.last_modified > before.last_modified);
}

#[tokio::test]
async fn empty_update_reports_false() {
  let s = store().await;
  let id = s
    .create_person(person("Idle", "idle@example.com", PersonType::Customer))
    .await
    .unwrap();
  assert!(!s.update_person(id, PersonUpdate::default()).await.unwrap());
}

#[tokio::test]
async fn update_missing_person_reports_false() {
  let s = store().await;
  let update = PersonUpdate { name: Some("Ghost".into()), ..Default::default() };
  assert!(!s.update_person(PersonId(999), update).await.unwrap());
}

#[tokio::test]
async fn update_to_taken_email_is_rejected() {
  let s = store().await;
  s.create_person(person("A", "a@example.com", PersonType::Customer))
    .await
    .unwrap();
  let b = s
    .create_person(person("B", "b@example.com", PersonType::Customer))
    .await
    .unwrap();

  let err = s
    .update_person(b, PersonUpdate {
      email: Some("a@example.com".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert_constraint(err, ConstraintKind::Unique);
}

#[tokio::test]
async fn delete_person() {
  let s = store().await;
  let id = s
    .create_person(person("Delete Test", "delete@example.com", PersonType::Customer))
    .await
    .unwrap();

  assert!(s.delete_person(id).await.unwrap());
  assert!(s.get_person(id).await.unwrap().is_none());
  assert!(!s.delete_person(id).await.unwrap());
}

// ─── Customers ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_customer_and_get_complete() {
  let s = store().await;
  let (person_id, customer_id) = s
    .create_customer(
      person("Complete Test", "complete@example.com", PersonType::Customer),
      customer(500, CustomerTier::Silver),
    )
    .await
    .unwrap();

  let record = s.get_customer_complete(customer_id).await.unwrap().unwrap();
  assert_eq!(record.person_id, person_id);
  assert_eq!(record.customer_id, customer_id);
  assert_eq!(record.name, "Complete Test");
  assert_eq!(record.loyalty_points, 500);
  assert_eq!(record.customer_tier, CustomerTier::Silver);
  assert_eq!(record.registration_date, Utc::now().date_naive());
}

#[tokio::test]
async fn get_customer_missing_returns_none() {
  let s = sample_store().await;
  assert!(s.get_customer_complete(CustomerId(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_customer_insert_rolls_back_person() {
  let s = store().await;
  let err = s
    .create_customer(
      person("Negative", "negative@example.com", PersonType::Customer),
      customer(-1, CustomerTier::Bronze),
    )
    .await
    .unwrap_err();
  assert_constraint(err, ConstraintKind::Check);

  assert!(s.list_persons().await.unwrap().is_empty());
}

#[tokio::test]
async fn customer_referencing_missing_person_is_rejected() {
  let s = store().await;
  let err = s
    .conn_execute("INSERT INTO customer (person_id) VALUES (4242)")
    .await
    .unwrap_err();
  assert_constraint(err, ConstraintKind::ForeignKey);
}

#[tokio::test]
async fn employee_referencing_missing_person_is_rejected() {
  let s = store().await;
  let err = s
    .conn_execute(
      "INSERT INTO employee (person_id, salary, department) VALUES (4242, 50000, 'Sales')",
    )
    .await
    .unwrap_err();
  assert_constraint(err, ConstraintKind::ForeignKey);
}

#[tokio::test]
async fn second_customer_row_for_same_person_is_rejected() {
  let s = store().await;
  let (person_id, _) = s
    .create_customer(
      person("Once", "once@example.com", PersonType::Customer),
      NewCustomer::default(),
    )
    .await
    .unwrap();

  let err = s
    .conn_execute(&format!(
      "INSERT INTO customer (person_id) VALUES ({})",
      person_id.0
    ))
    .await
    .unwrap_err();
  assert_constraint(err, ConstraintKind::Unique);
}

#[tokio::test]
async fn add_loyalty_points_accumulates() {
  let s = store().await;
  let (_, customer_id) = s
    .create_customer(
      person("Loyalty Test", "loyalty@example.com", PersonType::Customer),
      customer(100, CustomerTier::Bronze),
    )
    .await
    .unwrap();

  assert!(s.add_loyalty_points(customer_id, 50).await.unwrap());
  let record = s.get_customer_complete(customer_id).await.unwrap().unwrap();
  assert_eq!(record.loyalty_points, 150);

  let err = s.add_loyalty_points(customer_id, -151).await.unwrap_err();
  assert_constraint(err, ConstraintKind::Check);

  assert!(!s.add_loyalty_points(CustomerId(999), 10).await.unwrap());
}

#[tokio::test]
async fn loyalty_points_cannot_exceed_i32() {
  let s = store().await;
  let (_, customer_id) = s
    .create_customer(
      person("Max Points", "max.points@example.com", PersonType::Customer),
      customer(i32::MAX, CustomerTier::Platinum),
    )
    .await
    .unwrap();

  let err = s.add_loyalty_points(customer_id, 1).await.unwrap_err();
  assert_constraint(err, ConstraintKind::Check);

  let record = s.get_customer_complete(customer_id).await.unwrap().unwrap();
  assert_eq!(record.loyalty_points, i32::MAX);
}

#[tokio::test]
async fn customers_by_tier_orders_by_points() {
  let s = sample_store().await;
  let gold = s.customers_by_tier(CustomerTier::Gold).await.unwrap();
  assert_eq!(gold.len(), 2);
  assert!(gold.iter().all(|c| c.customer_tier == CustomerTier::Gold));
  assert!(gold[0].loyalty_points >= gold[1].loyalty_points);

  let all = s.list_customers().await.unwrap();
  assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn deleting_person_cascades_to_customer() {
  let s = store().await;
  let (person_id, customer_id) = s
    .create_customer(
      person("Cascade Test", "cascade@example.com", PersonType::Customer),
      customer(200, CustomerTier::Silver),
    )
    .await
    .unwrap();

  assert!(s.delete_person(person_id).await.unwrap());
  assert!(s.get_customer_complete(customer_id).await.unwrap().is_none());
}

// ─── Employees ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_employee_with_manager() {
  let s = store().await;
  let (_, manager_id) = s
    .create_employee(
      person("Boss", "boss@example.com", PersonType::Employee),
      NewEmployee {
        position: Some("Director".into()),
        ..NewEmployee::new(150_000.0, "Engineering")
      },
    )
    .await
    .unwrap();

  let hired = Utc::now().date_naive() - Days::new(30);
  let (person_id, employee_id) = s
    .create_employee(
      person("Report", "report@example.com", PersonType::Employee),
      NewEmployee {
        manager_id: Some(manager_id),
        hire_date: Some(hired),
        ..NewEmployee::new(90_000.0, "Engineering")
      },
    )
    .await
    .unwrap();

  let record = s.get_employee_complete(employee_id).await.unwrap().unwrap();
  assert_eq!(record.person_id, person_id);
  assert_eq!(record.manager_id, Some(manager_id));
  assert_eq!(record.manager_name.as_deref(), Some("Boss"));
  assert_eq!(record.hire_date, hired);
  assert_eq!(record.salary, 90_000.0);

  let boss = s.get_employee_complete(manager_id).await.unwrap().unwrap();
  assert_eq!(boss.hire_date, Utc::now().date_naive());
  assert!(boss.manager_name.is_none());
}

#[tokio::test]
async fn future_hire_date_is_rejected() {
  let s = store().await;
  let err = s
    .create_employee(
      person("Early", "early@example.com", PersonType::Employee),
      NewEmployee {
        hire_date: Some(Utc::now().date_naive() + Days::new(7)),
        ..NewEmployee::new(50_000.0, "Sales")
      },
    )
    .await
    .unwrap_err();
  match err {
    Error::Constraint { kind, constraint, .. } => {
      assert_eq!(kind, ConstraintKind::Check);
      assert_eq!(constraint.as_deref(), Some("chk_employee_hire_date"));
    }
    other => panic!("unexpected error: {other:?}"),
  }
  assert!(s.list_persons().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_positive_salary_is_rejected() {
  let s = store().await;
  let err = s
    .create_employee(
      person("Volunteer", "volunteer@example.com", PersonType::Employee),
      NewEmployee::new(0.0, "Sales"),
    )
    .await
    .unwrap_err();
  assert_constraint(err, ConstraintKind::Check);
}

#[tokio::test]
async fn deleting_manager_clears_manager_reference() {
  let s = store().await;
  let (boss_person, boss_id) = s
    .create_employee(
      person("Boss", "boss@example.com", PersonType::Employee),
      NewEmployee::new(150_000.0, "Engineering"),
    )
    .await
    .unwrap();
  let (_, report_id) = s
    .create_employee(
      person("Report", "report@example.com", PersonType::Employee),
      NewEmployee {
        manager_id: Some(boss_id),
        ..NewEmployee::new(90_000.0, "Engineering")
      },
    )
    .await
    .unwrap();

  assert!(s.delete_person(boss_person).await.unwrap());
  assert!(s.get_employee_complete(boss_id).await.unwrap().is_none());

  let report = s.get_employee_complete(report_id).await.unwrap().unwrap();
  assert_eq!(report.manager_id, None);
}

#[tokio::test]
async fn employees_by_department_and_statistics() {
  let s = sample_store().await;

  let engineering = s.employees_by_department("Engineering").await.unwrap();
  assert_eq!(engineering.len(), 3);
  assert!(engineering.iter().all(|e| e.department == "Engineering"));
  let managed: Vec<_> = engineering
    .iter()
    .filter_map(|e| e.manager_name.as_deref())
    .collect();
  assert_eq!(managed, ["Emily Davis", "Emily Davis"]);

  let stats = s.department_statistics().await.unwrap();
  assert_eq!(stats.len(), 3);
  assert!(stats.windows(2).all(|w| w[0].avg_salary >= w[1].avg_salary));

  let eng = stats.iter().find(|d| d.department == "Engineering").unwrap();
  assert_eq!(eng.employee_count, 3);
  assert_eq!(eng.min_salary, 88_000.0);
  assert_eq!(eng.max_salary, 125_000.0);
  assert_eq!(eng.total_salary, 308_000.0);
}

#[tokio::test]
async fn get_employee_missing_returns_none() {
  let s = sample_store().await;
  assert!(s.get_employee_complete(EmployeeId(999)).await.unwrap().is_none());
}

// ─── Relational algebra ──────────────────────────────────────────────────────

#[tokio::test]
async fn sample_data_is_idempotent() {
  let s = sample_store().await;
  s.load_sample_data().await.unwrap();
  assert_eq!(s.list_persons().await.unwrap().len(), 10);
  assert_eq!(s.list_customers().await.unwrap().len(), 6);
}

#[tokio::test]
async fn selection_filters_on_loyalty() {
  let s = sample_store().await;
  let selected = s.demonstrate_selection(DEFAULT_MIN_LOYALTY).await.unwrap();

  let names: Vec<_> = selected.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["Michael Johnson", "John Smith", "Lisa Anderson"]);
  assert!(selected.iter().all(|c| c.loyalty_points >= DEFAULT_MIN_LOYALTY));
  assert_eq!(selected[0].customer_tier, CustomerTier::Platinum);
}

#[tokio::test]
async fn projection_returns_distinct_departments() {
  let s = sample_store().await;
  let departments = s.demonstrate_projection().await.unwrap();
  assert_eq!(departments, ["Engineering", "Marketing", "Sales"]);
}

#[tokio::test]
async fn union_has_no_duplicates() {
  let s = sample_store().await;
  let contacts = s.demonstrate_union().await.unwrap();

  // 6 customers + 6 employees - 2 persons holding both roles.
  assert_eq!(contacts.len(), 10);
  let unique: HashSet<_> = contacts.iter().collect();
  assert_eq!(unique.len(), contacts.len());
}

#[tokio::test]
async fn intersection_is_exactly_dual_role_persons() {
  let s = sample_store().await;
  let both = s.demonstrate_intersection().await.unwrap();

  let ids: Vec<_> = both.iter().map(|d| d.person.person_id).collect();
  assert_eq!(ids, [PersonId(3), PersonId(8)]);

  let emails: Vec<_> = both.iter().map(|d| d.person.email.as_str()).collect();
  assert_eq!(emails, DUAL_ROLE_EMAILS);
  assert_eq!(both[0].loyalty_points, 3200);
  assert_eq!(both[0].department, "Engineering");
}

#[tokio::test]
async fn difference_in_both_directions() {
  let s = sample_store().await;
  let diff = s.demonstrate_difference().await.unwrap();

  assert_eq!(
    diff.customer_ids(),
    [PersonId(1), PersonId(2), PersonId(5), PersonId(9)]
  );
  assert_eq!(
    diff.employee_ids(),
    [PersonId(4), PersonId(6), PersonId(7), PersonId(10)]
  );

  let customers: HashSet<_> = diff.customer_ids().into_iter().collect();
  assert!(diff.employee_ids().iter().all(|id| !customers.contains(id)));
}

#[tokio::test]
async fn new_dual_role_person_moves_from_difference_to_intersection() {
  let s = sample_store().await;
  let (person_id, _) = s
    .create_customer(
      person("Alice Thompson", "alice.thompson@email.com", PersonType::Both),
      customer(500, CustomerTier::Silver),
    )
    .await
    .unwrap();

  let diff = s.demonstrate_difference().await.unwrap();
  assert!(diff.customer_ids().contains(&person_id));

  s.conn_execute(&format!(
    "INSERT INTO employee (person_id, salary, department) VALUES ({}, 70000, 'Support')",
    person_id.0
  ))
  .await
  .unwrap();

  let diff = s.demonstrate_difference().await.unwrap();
  assert!(!diff.customer_ids().contains(&person_id));
  let both = s.demonstrate_intersection().await.unwrap();
  assert!(both.iter().any(|d| d.person.person_id == person_id));
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

impl SqliteStore {
  /// Run a raw statement, for exercising constraints the public API never
  /// violates on its own.
  async fn conn_execute(&self, sql: &str) -> crate::Result<usize> {
    let sql = sql.to_owned();
    Ok(self.conn.call(move |conn| Ok(conn.execute(&sql, [])?)).await?)
  }
}
