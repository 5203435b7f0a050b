//! Configuration types for the HRM payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::{EmployerSettings, Employee, LeaveType, Loan, Overtime, Shift};

/// Employer settings file structure (`engine.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct EmployersConfig {
    /// Settings for each employer served by this instance.
    pub employers: Vec<EmployerSettings>,
}

/// Reference data file structure (`reference.yaml`).
///
/// These are the records the engines read but never write: shifts,
/// employees, leave types, loans and manual overtime grants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceData {
    /// Shift definitions.
    #[serde(default)]
    pub shifts: Vec<Shift>,
    /// Employees.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Leave types.
    #[serde(default)]
    pub leave_types: Vec<LeaveType>,
    /// Loans.
    #[serde(default)]
    pub loans: Vec<Loan>,
    /// Manual overtime grants.
    #[serde(default)]
    pub overtimes: Vec<Overtime>,
}

/// The complete engine configuration.
///
/// This is the top-level configuration structure that combines the
/// employer settings with the reference data.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    employers: Vec<EmployerSettings>,
    reference: ReferenceData,
}

impl EngineConfig {
    /// Creates a new configuration from its parts.
    pub fn new(employers: Vec<EmployerSettings>, reference: ReferenceData) -> Self {
        Self {
            employers,
            reference,
        }
    }

    /// Returns the configured employers.
    pub fn employers(&self) -> &[EmployerSettings] {
        &self.employers
    }

    /// Returns the reference data.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }
}
