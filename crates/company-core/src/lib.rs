//! Core types and trait definitions for the company directory.
//!
//! The schema models a generalization: [`person::Person`] is the supertype,
//! [`customer`] and [`employee`] rows are one-to-one subtype extensions of it.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! implement [`store::CompanyStore`]; everything above them (the CLI, tests)
//! depends on the trait only.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod algebra;
pub mod customer;
pub mod employee;
pub mod error;
pub mod person;
pub mod sample;
pub mod store;

pub use error::{ConstraintKind, Error, Result};
