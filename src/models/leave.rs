//! Leave type and leave application models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A category of leave (e.g., "Annual", "Sick") with its yearly allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Unique identifier for the leave type.
    pub id: u64,
    /// The employer that owns the leave type.
    pub employer_id: u64,
    /// Display name.
    pub name: String,
    /// Days of this leave an employee may take per calendar year.
    pub max_days_per_year: i64,
    /// Whether the leave is paid. Unpaid leave is deducted from salary.
    pub is_paid: bool,
}

/// Lifecycle of a leave application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Granted.
    Approved,
    /// Refused.
    Rejected,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// A request by an employee to take leave over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Unique identifier for the application.
    pub id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// The employee requesting leave.
    pub employee_id: u64,
    /// The leave type requested.
    pub leave_type_id: u64,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count of the range.
    pub total_days: i64,
    /// Reason given by the employee.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current status.
    pub status: LeaveStatus,
}

impl LeaveApplication {
    /// Returns the inclusive number of days covered, never less than one.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrm_payroll::models::leave_days;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
    /// assert_eq!(leave_days(start, end), 3);
    /// assert_eq!(leave_days(end, start), 1);
    /// ```
    pub fn leave_days(&self) -> i64 {
        leave_days(self.start_date, self.end_date)
    }

    /// Returns true if the application covers `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the application shares at least one day with `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    /// Returns true if the application is approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}

/// Inclusive day count between two dates, floored at one.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn application(start: &str, end: &str) -> LeaveApplication {
        LeaveApplication {
            id: 1,
            employer_id: 1,
            employee_id: 1,
            leave_type_id: 1,
            start_date: make_date(start),
            end_date: make_date(end),
            total_days: leave_days(make_date(start), make_date(end)),
            reason: None,
            status: LeaveStatus::Approved,
        }
    }

    #[test]
    fn test_single_day_leave_counts_one() {
        assert_eq!(application("2026-01-05", "2026-01-05").leave_days(), 1);
    }

    #[test]
    fn test_leave_days_inclusive() {
        assert_eq!(application("2026-01-28", "2026-02-02").leave_days(), 6);
    }

    #[test]
    fn test_covers_and_overlaps() {
        let leave = application("2026-01-05", "2026-01-07");
        assert!(leave.covers(make_date("2026-01-07")));
        assert!(!leave.covers(make_date("2026-01-08")));
        assert!(leave.overlaps(make_date("2026-01-07"), make_date("2026-01-09")));
        assert!(!leave.overlaps(make_date("2026-01-08"), make_date("2026-01-09")));
    }

    #[test]
    fn test_leave_status_serialization() {
        assert_eq!(
            serde_json::to_string(&LeaveStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(LeaveStatus::Rejected.to_string(), "rejected");
    }
}
