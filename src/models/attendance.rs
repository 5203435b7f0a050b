//! Attendance record model.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of a day's attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Worked at least the standard shift hours.
    #[serde(rename = "present")]
    Present,
    /// Worked at least half, but less than all, of the standard hours.
    #[serde(rename = "half day")]
    HalfDay,
    /// Worked less than half the standard hours, or not at all.
    #[serde(rename = "absent")]
    Absent,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::HalfDay => "half day",
            AttendanceStatus::Absent => "absent",
        };
        f.write_str(label)
    }
}

/// One employee's attendance for one calendar date.
///
/// There is at most one record per `(employee_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// The employee.
    pub employee_id: u64,
    /// The calendar date the record belongs to.
    pub date: NaiveDate,
    /// Clock-in timestamp.
    pub clock_in: Option<NaiveDateTime>,
    /// Clock-out timestamp; `None` while the record is open.
    pub clock_out: Option<NaiveDateTime>,
    /// Worked hours after break deduction.
    pub total_hours: Decimal,
    /// Break hours deducted.
    pub break_hours: Decimal,
    /// Hours worked beyond the standard shift hours.
    pub overtime_hours: Decimal,
    /// Overtime hours priced at the employee's hourly rate.
    pub overtime_amount: Decimal,
    /// Attendance classification.
    pub status: AttendanceStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Creates an empty record for the employee and date, to be filled in by clock-in.
    pub fn new(employer_id: u64, employee_id: u64, date: NaiveDate) -> Self {
        Self {
            id: 0,
            employer_id,
            employee_id,
            date,
            clock_in: None,
            clock_out: None,
            total_hours: Decimal::ZERO,
            break_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            overtime_amount: Decimal::ZERO,
            status: AttendanceStatus::Absent,
            notes: None,
        }
    }

    /// Returns true if the employee clocked in but has not clocked out.
    pub fn is_open(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization_uses_spaced_half_day() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half day\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"present\""
        );
        let parsed: AttendanceStatus = serde_json::from_str("\"absent\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Absent);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "half day");
    }

    #[test]
    fn test_is_open() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let mut record = AttendanceRecord::new(1, 1, date);
        assert!(!record.is_open());

        record.clock_in = Some(date.and_hms_opt(9, 0, 0).unwrap());
        assert!(record.is_open());

        record.clock_out = Some(date.and_hms_opt(17, 0, 0).unwrap());
        assert!(!record.is_open());
    }
}
