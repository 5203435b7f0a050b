//! HRM attendance time accounting and payroll engine.
//!
//! This crate turns clock events into worked, break and overtime hours,
//! validates attendance and leave against each employer's working days
//! and holidays, and runs payrolls that fold salary, allowances,
//! deductions, loans, overtime and unpaid leave into per-employee entries.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod compensation;
pub mod config;
pub mod error;
pub mod leave;
pub mod models;
pub mod payroll;
pub mod store;
