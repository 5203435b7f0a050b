//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type, the inclusive date window
//! a payroll run aggregates attendance, leave, loans and overtime over.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive date range covered by one payroll.
///
/// # Example
///
/// ```
/// use hrm_payroll::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// assert_eq!(period.days().count(), 31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period from its bounds.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Checks if a given date falls within this pay period (inclusive of both ends).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if `[start, end]` shares at least one day with the period.
    ///
    /// Used for loans and manual overtime.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }

    /// Returns true if either endpoint of `[start, end]` falls inside the period.
    ///
    /// Used for leave applications. A leave that begins before and ends
    /// after the period is not matched.
    pub fn has_endpoint_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.contains_date(start) || self.contains_date(end)
    }

    /// Iterates every calendar day of the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |day| *day <= self.end_date)
    }
}
