//! `company query <op>`: run one relational-algebra operator and print it.

use clap::ValueEnum;
use company_core::store::CompanyStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Operator {
  Selection,
  Projection,
  Union,
  Intersection,
  Difference,
  /// Salary aggregates per department.
  Stats,
}

fn emit<T: Serialize>(value: &T, json: bool, text: impl FnOnce(&T)) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    text(value);
  }
  Ok(())
}

pub async fn run<S: CompanyStore>(
  store: &S,
  op: Operator,
  min_loyalty: i32,
  json: bool,
) -> anyhow::Result<()> {
  match op {
    Operator::Selection => {
      let rows = store.demonstrate_selection(min_loyalty).await?;
      emit(&rows, json, |rows| {
        for c in rows {
          println!("{}\t{}\t{}\t{}", c.name, c.email, c.loyalty_points, c.customer_tier);
        }
      })
    }
    Operator::Projection => {
      let rows = store.demonstrate_projection().await?;
      emit(&rows, json, |rows| rows.iter().for_each(|d| println!("{d}")))
    }
    Operator::Union => {
      let rows = store.demonstrate_union().await?;
      emit(&rows, json, |rows| {
        for c in rows {
          println!("{}\t{}\t{}", c.name, c.phone.as_deref().unwrap_or("-"), c.email);
        }
      })
    }
    Operator::Intersection => {
      let rows = store.demonstrate_intersection().await?;
      emit(&rows, json, |rows| {
        for d in rows {
          println!(
            "{}\t{}\t{}\t{}",
            d.person.person_id, d.person.name, d.loyalty_points, d.department
          );
        }
      })
    }
    Operator::Difference => {
      let diff = store.demonstrate_difference().await?;
      emit(&diff, json, |diff| {
        println!("customers only:");
        for c in &diff.customers_only {
          println!("  {}\t{}\t{}", c.person.person_id, c.person.name, c.loyalty_points);
        }
        println!("employees only:");
        for e in &diff.employees_only {
          println!("  {}\t{}\t{}", e.person.person_id, e.person.name, e.department);
        }
      })
    }
    Operator::Stats => {
      let rows = store.department_statistics().await?;
      emit(&rows, json, |rows| {
        for s in rows {
          println!(
            "{}\t{}\tavg {:.2}\tmin {:.2}\tmax {:.2}\ttotal {:.2}",
            s.department,
            s.employee_count,
            s.avg_salary,
            s.min_salary,
            s.max_salary,
            s.total_salary
          );
        }
      })
    }
  }
}
