//! Shift model.
//!
//! A shift is the reference working window (start, end and an optional
//! unpaid break) that actual clock times are compared against.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Minutes in a calendar day, used for next-day rollover of time-of-day spans.
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Represents a shift definition assigned to employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: u64,
    /// The employer that owns the shift.
    pub employer_id: u64,
    /// Display name of the shift (e.g., "Day", "Night").
    pub name: String,
    /// Time of day the shift starts.
    pub start_time: NaiveTime,
    /// Time of day the shift ends. May be earlier than `start_time` for
    /// shifts that cross midnight.
    pub end_time: NaiveTime,
    /// Time of day the unpaid break starts.
    #[serde(default)]
    pub break_start_time: Option<NaiveTime>,
    /// Time of day the unpaid break ends.
    #[serde(default)]
    pub break_end_time: Option<NaiveTime>,
    /// Whether this is a night shift.
    #[serde(default)]
    pub is_night_shift: bool,
}

impl Shift {
    /// Returns the configured break window as `(start, end)` times, if both ends are set.
    pub fn break_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.break_start_time, self.break_end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Returns the length of the shift in minutes, rolling the end over to
    /// the next day when it precedes the start.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrm_payroll::models::Shift;
    /// use chrono::NaiveTime;
    ///
    /// let night = Shift {
    ///     id: 1,
    ///     employer_id: 1,
    ///     name: "Night".to_string(),
    ///     start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    ///     break_start_time: None,
    ///     break_end_time: None,
    ///     is_night_shift: true,
    /// };
    /// assert_eq!(night.span_minutes(), 480);
    /// ```
    pub fn span_minutes(&self) -> i64 {
        rolled_minutes(self.start_time, self.end_time)
    }

    /// Returns the length of the break in minutes (0 when no break is configured).
    pub fn break_minutes(&self) -> i64 {
        self.break_window()
            .map(|(start, end)| rolled_minutes(start, end))
            .unwrap_or(0)
    }

    /// Returns the timestamp the shift ends for a shift that started at `clock_in`.
    ///
    /// The end time is placed on the clock-in date and moved to the next day
    /// if that would put it before the clock-in.
    pub fn end_after(&self, clock_in: NaiveDateTime) -> NaiveDateTime {
        let end = clock_in.date().and_time(self.end_time);
        if end < clock_in {
            end + Duration::days(1)
        } else {
            end
        }
    }

    /// Places the break window on concrete timestamps for the working
    /// interval `[clock_in, clock_out]`.
    ///
    /// The window is tried on the day before, the day of and the day after
    /// the clock-in, and the first placement that intersects the interval
    /// wins. Without any intersection it stays on the clock-in date. A
    /// break end earlier than its start rolls into the next day.
    pub fn break_window_for(
        &self,
        clock_in: NaiveDateTime,
        clock_out: NaiveDateTime,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (start, end) = self.break_window()?;
        let place = |anchor: NaiveDate| {
            let break_start = anchor.and_time(start);
            let mut break_end = anchor.and_time(end);
            if break_end < break_start {
                break_end += Duration::days(1);
            }
            (break_start, break_end)
        };

        let date = clock_in.date();
        let window = [date.pred_opt(), Some(date), date.succ_opt()]
            .into_iter()
            .flatten()
            .map(place)
            .find(|&(break_start, break_end)| break_start < clock_out && break_end > clock_in)
            .unwrap_or_else(|| place(date));
        Some(window)
    }
}

/// Minutes from `start` to `end`, treating an earlier `end` as the next day.
fn rolled_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}
