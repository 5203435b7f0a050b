//! Employee model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee as seen by the attendance and payroll engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: u64,
    /// The employer the employee belongs to.
    pub employer_id: u64,
    /// Display name.
    pub name: String,
    /// The shift the employee is assigned to, if any.
    #[serde(default)]
    pub shift_id: Option<u64>,
    /// Basic salary for a full pay period.
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    /// Hourly rate used to price attendance-derived overtime.
    #[serde(default)]
    pub rate_per_hour: Option<Decimal>,
}

impl Employee {
    /// Returns the basic salary, treating an unset salary as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrm_payroll::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     employer_id: 1,
    ///     name: "Ada".to_string(),
    ///     shift_id: None,
    ///     basic_salary: None,
    ///     rate_per_hour: None,
    /// };
    /// assert_eq!(employee.basic_salary_or_zero(), Decimal::ZERO);
    /// ```
    pub fn basic_salary_or_zero(&self) -> Decimal {
        self.basic_salary.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_employee_with_rates() {
        let json = r#"{
            "id": 12,
            "employer_id": 1,
            "name": "Grace",
            "shift_id": 3,
            "basic_salary": "3000.00",
            "rate_per_hour": "15.50"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.shift_id, Some(3));
        assert_eq!(employee.basic_salary, Some(Decimal::new(300000, 2)));
        assert_eq!(employee.rate_per_hour, Some(Decimal::new(1550, 2)));
    }

    #[test]
    fn test_deserialize_employee_without_optional_fields() {
        let json = r#"{ "id": 1, "employer_id": 1, "name": "Linus" }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.shift_id, None);
        assert_eq!(employee.basic_salary_or_zero(), Decimal::ZERO);
    }
}
