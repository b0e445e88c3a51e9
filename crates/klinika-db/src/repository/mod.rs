//! # Repositories
//!
//! One repository per aggregate. Each is a thin struct over the shared
//! `SqlitePool`; multi-row operations (sales, bills, prescriptions,
//! payments) open their own transactions so a failure anywhere rolls
//! back everything.
//!
//! All create/update methods take the current time as an explicit
//! parameter instead of reading the clock, so tests control every
//! timestamp.

pub mod appointment;
pub mod billing;
pub mod dashboard;
pub mod medical_record;
pub mod medicine;
pub mod patient;
pub mod prescription;
pub mod product;
pub mod sale;
pub mod service;
pub mod user;
