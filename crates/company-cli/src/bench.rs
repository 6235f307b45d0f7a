//! Latency benchmarks for the read paths of a [`CompanyStore`].

use std::{future::Future, time::Instant};

use company_core::{customer::CustomerId, store::CompanyStore};
use serde::Serialize;
use tracing::info;

/// Summary of one benchmark, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
  pub name:       String,
  pub iterations: usize,
  pub mean:       f64,
  pub median:     f64,
  /// Sample standard deviation; zero for a single sample.
  pub stdev:      f64,
  pub min:        f64,
  pub max:        f64,
  pub p95:        f64,
}

impl Stats {
  /// Summarise `samples`. Returns `None` when there are none.
  pub fn from_samples(name: &str, samples: &mut [f64]) -> Option<Self> {
    let n = samples.len();
    if n == 0 {
      return None;
    }
    samples.sort_by(f64::total_cmp);

    let mean = samples.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
      (samples[n / 2 - 1] + samples[n / 2]) / 2.0
    } else {
      samples[n / 2]
    };
    let stdev = if n > 1 {
      let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>()
        / (n - 1) as f64;
      var.sqrt()
    } else {
      0.0
    };
    let p95 = samples[((n as f64 * 0.95) as usize).min(n - 1)];

    Some(Self {
      name: name.to_owned(),
      iterations: n,
      mean,
      median,
      stdev,
      min: samples[0],
      max: samples[n - 1],
      p95,
    })
  }
}

/// Run `op` `iterations` times and summarise the wall-clock latencies.
async fn measure<F, Fut, T, E>(
  name: &str,
  iterations: usize,
  mut op: F,
) -> Result<Option<Stats>, E>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
{
  info!(name, iterations, "benchmark started");
  let mut samples = Vec::with_capacity(iterations);
  for _ in 0..iterations {
    let start = Instant::now();
    op().await?;
    samples.push(start.elapsed().as_secs_f64() * 1000.0);
  }
  Ok(Stats::from_samples(name, &mut samples))
}

fn scaled(iterations: usize, scale: f64) -> usize {
  ((iterations as f64 * scale).round() as usize).max(1)
}

/// The benchmark suite: one customer lookup, all customers, department
/// statistics, union and intersection. `scale` multiplies every iteration
/// count.
pub async fn run_all<S: CompanyStore>(
  store: &S,
  scale: f64,
) -> Result<Vec<Stats>, S::Error> {
  let mut results = Vec::new();

  results.extend(
    measure("Single Customer Lookup", scaled(1000, scale), || {
      store.get_customer_complete(CustomerId(1))
    })
    .await?,
  );
  results.extend(
    measure("Retrieve All Customers", scaled(100, scale), || {
      store.list_customers()
    })
    .await?,
  );
  results.extend(
    measure("Department Statistics", scaled(500, scale), || {
      store.department_statistics()
    })
    .await?,
  );
  results.extend(
    measure("Union Operation", scaled(500, scale), || store.demonstrate_union())
      .await?,
  );
  results.extend(
    measure("Intersection Operation", scaled(500, scale), || {
      store.demonstrate_intersection()
    })
    .await?,
  );

  Ok(results)
}

pub fn print(results: &[Stats]) {
  println!("{}", "=".repeat(80));
  println!("BENCHMARK RESULTS");
  println!("{}", "=".repeat(80));

  for r in results {
    println!("\n{}:", r.name);
    println!("  Iterations:  {}", r.iterations);
    println!("  Mean:        {:.3} ms", r.mean);
    println!("  Median:      {:.3} ms", r.median);
    println!("  Std Dev:     {:.3} ms", r.stdev);
    println!("  Min:         {:.3} ms", r.min);
    println!("  Max:         {:.3} ms", r.max);
    println!("  95th %ile:   {:.3} ms", r.p95);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn summarises_odd_sample_count() {
    let mut samples = [5.0, 1.0, 3.0];
    let stats = Stats::from_samples("t", &mut samples).unwrap();
    assert_eq!(stats.iterations, 3);
    assert_eq!(stats.mean, 3.0);
    assert_eq!(stats.median, 3.0);
    assert_eq!(stats.stdev, 2.0);
    assert_eq!((stats.min, stats.max), (1.0, 5.0));
    assert_eq!(stats.p95, 5.0);
  }

  #[test]
  fn median_of_even_count_averages_middle_pair() {
    let mut samples = [4.0, 1.0, 2.0, 3.0];
    let stats = Stats::from_samples("t", &mut samples).unwrap();
    assert_eq!(stats.median, 2.5);
  }

  #[test]
  fn p95_picks_the_95th_percentile_rank() {
    let mut samples: Vec<f64> = (1..=100).map(f64::from).collect();
    let stats = Stats::from_samples("t", &mut samples).unwrap();
    assert_eq!(stats.p95, 96.0);
  }

  #[test]
  fn single_sample_has_zero_stdev_and_empty_is_none() {
    let stats = Stats::from_samples("t", &mut [7.0]).unwrap();
    assert_eq!(stats.stdev, 0.0);
    assert!(Stats::from_samples("t", &mut []).is_none());
  }

  #[test]
  fn scaling_never_drops_to_zero() {
    assert_eq!(scaled(1000, 0.01), 10);
    assert_eq!(scaled(100, 0.0), 1);
  }

  #[tokio::test]
  async fn measure_propagates_the_first_error() {
    let mut calls = 0;
    let result: Result<Option<Stats>, &str> = measure("t", 5, || {
      calls += 1;
      let n = calls;
      async move { if n == 3 { Err("boom") } else { Ok(()) } }
    })
    .await;
    assert_eq!(result.unwrap_err(), "boom");
    assert_eq!(calls, 3);
  }
}
