//! Configuration loading and management for the HRM payroll engine.
//!
//! This module loads per-employer settings (working days, IP allow-list,
//! holidays) and the reference data the engines read (shifts, employees,
//! leave types, loans, manual overtime) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use hrm_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Employers configured: {}", config.config().employers().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EmployersConfig, EngineConfig, ReferenceData};
