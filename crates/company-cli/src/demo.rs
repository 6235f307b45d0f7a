//! The guided walkthrough: create a customer, read it back, then run each
//! relational-algebra operator over the directory.

use company_core::{
  algebra::DEFAULT_MIN_LOYALTY,
  customer::{CustomerTier, NewCustomer},
  person::{NewPerson, PersonType},
  store::CompanyStore,
};

const DEMO_EMAIL: &str = "alice.thompson@email.com";

fn banner(title: &str) {
  println!("{}", "=".repeat(80));
  println!("{title}");
  println!("{}", "=".repeat(80));
}

/// Run the walkthrough. Unless `keep` is set, the demo customer is deleted at
/// the end, which also shows the cascade from person to customer.
pub async fn run<S: CompanyStore>(store: &S, keep: bool) -> anyhow::Result<()> {
  banner("DATABASE GENERALIZATION DEMONSTRATION");

  println!("\n1. Creating New Customer...");
  let person = NewPerson::new("Alice Thompson", DEMO_EMAIL, PersonType::Customer)
    .with_address("100 Tech Street, Seattle, WA")
    .with_phone("555-0200");
  let customer = NewCustomer { loyalty_points: 500, customer_tier: CustomerTier::Silver };
  let (person_id, customer_id) = store.create_customer(person, customer).await?;
  println!("   Created: PersonID={person_id}, CustomerID={customer_id}");

  println!("\n2. Retrieving Complete Customer Information...");
  if let Some(info) = store.get_customer_complete(customer_id).await? {
    println!("   Name: {}", info.name);
    println!("   Email: {}", info.email);
    println!("   Loyalty Points: {}", info.loyalty_points);
    println!("   Tier: {}", info.customer_tier);
  }

  println!("\n3. UNION Operation - All Contacts");
  println!("   Relational Algebra: π[Name,Phone,Email](Customers) ∪ π[Name,Phone,Email](Employees)");
  let contacts = store.demonstrate_union().await?;
  println!("   Found {} unique contacts:", contacts.len());
  for contact in contacts.iter().take(5) {
    println!("   - {}: {}", contact.name, contact.email);
  }

  println!("\n4. INTERSECTION Operation - Both Customer AND Employee");
  println!("   Relational Algebra: π[PersonID](Customers) ∩ π[PersonID](Employees)");
  let both = store.demonstrate_intersection().await?;
  println!("   Found {} persons with both roles:", both.len());
  for dual in &both {
    println!(
      "   - {}: {} pts, {} dept",
      dual.person.name, dual.loyalty_points, dual.department
    );
  }

  println!("\n5. SET DIFFERENCE Operation");
  println!("   Relational Algebra: π[PersonID](Customers) - π[PersonID](Employees)");
  let diff = store.demonstrate_difference().await?;
  println!("   Customers only: {}", diff.customers_only.len());
  println!("   Employees only: {}", diff.employees_only.len());

  println!("\n6. PROJECTION Operation - Unique Departments");
  println!("   Relational Algebra: π[Department](Employee)");
  let departments = store.demonstrate_projection().await?;
  println!("   Departments: {}", departments.join(", "));

  println!("\n7. SELECTION Operation - High-Value Customers");
  println!("   Relational Algebra: σ[LoyaltyPoints >= {DEFAULT_MIN_LOYALTY}](Customers)");
  let high_value = store.demonstrate_selection(DEFAULT_MIN_LOYALTY).await?;
  println!("   Found {} high-value customers:", high_value.len());
  for c in &high_value {
    println!("   - {}: {} points ({})", c.name, c.loyalty_points, c.customer_tier);
  }

  println!("\n8. AGGREGATE Operation - Department Statistics");
  println!("   Relational Algebra: γ[Department; AVG(Salary), COUNT(*)](Employee)");
  for stat in store.department_statistics().await? {
    println!("   {}:", stat.department);
    println!("      Employees: {}", stat.employee_count);
    println!("      Avg Salary: ${:.2}", stat.avg_salary);
  }

  if !keep {
    println!("\n9. CASCADE DELETE - Removing the demo person");
    store.delete_person(person_id).await?;
    let gone = store.get_customer_complete(customer_id).await?.is_none();
    println!("   Customer row removed with its person: {gone}");
  }

  println!();
  banner("DEMONSTRATION COMPLETE");
  Ok(())
}
