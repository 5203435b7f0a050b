//! Employer settings and holidays.
//!
//! Working days use weekday indices with 0 = Sunday through 6 = Saturday.

use std::net::IpAddr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A named holiday over an inclusive date range.
///
/// # Example
///
/// ```
/// use hrm_payroll::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     name: "New Year".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
/// };
/// assert!(holiday.covers(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The name of the holiday.
    pub name: String,
    /// First day of the holiday.
    pub start_date: NaiveDate,
    /// Last day of the holiday.
    pub end_date: NaiveDate,
}

impl Holiday {
    /// Returns true if `date` is inside the holiday.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Per-employer settings read by the attendance and payroll engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerSettings {
    /// The employer these settings belong to.
    pub employer_id: u64,
    /// Weekday indices (0 = Sunday .. 6 = Saturday) that are working days.
    #[serde(default)]
    pub working_days: Vec<u8>,
    /// Whether clock-in/out is restricted to `allowed_ips`.
    #[serde(default)]
    pub ip_restriction_enabled: bool,
    /// Addresses allowed to clock in/out when the restriction is on.
    #[serde(default)]
    pub allowed_ips: Vec<IpAddr>,
    /// Holidays observed by the employer.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl EmployerSettings {
    /// Creates settings with the given working days and no restrictions or holidays.
    pub fn new(employer_id: u64, working_days: Vec<u8>) -> Self {
        Self {
            employer_id,
            working_days,
            ip_restriction_enabled: false,
            allowed_ips: Vec::new(),
            holidays: Vec::new(),
        }
    }

    /// Returns true if `date` falls on a configured working weekday.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        is_working_weekday(&self.working_days, date)
    }

    /// Returns the holiday covering `date`, if any.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.covers(date))
    }

    /// Rejects `date` if it is not a working weekday or falls on a holiday.
    pub fn check_workable(&self, date: NaiveDate) -> EngineResult<()> {
        if !self.is_working_day(date) {
            return Err(EngineError::NonWorkingDay { date });
        }
        if let Some(holiday) = self.holiday_on(date) {
            return Err(EngineError::Holiday {
                date,
                name: holiday.name.clone(),
            });
        }
        Ok(())
    }

    /// Returns true if a clock action from `ip` is permitted.
    pub fn permits_ip(&self, ip: Option<IpAddr>) -> bool {
        if !self.ip_restriction_enabled {
            return true;
        }
        ip.is_some_and(|ip| self.allowed_ips.contains(&ip))
    }
}

/// Returns the 0 = Sunday based weekday index of `date`.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Returns true if `date`'s weekday index is in `working_days`.
pub fn is_working_weekday(working_days: &[u8], date: NaiveDate) -> bool {
    working_days.contains(&weekday_index(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn weekdays() -> EmployerSettings {
        EmployerSettings::new(1, vec![1, 2, 3, 4, 5])
    }

    #[test]
    fn test_weekday_index_starts_at_sunday() {
        // 2026-01-18 is a Sunday, 2026-01-17 a Saturday
        assert_eq!(weekday_index(make_date("2026-01-18")), 0);
        assert_eq!(weekday_index(make_date("2026-01-17")), 6);
        assert_eq!(weekday_index(make_date("2026-01-19")), 1);
    }

    #[test]
    fn test_is_working_day() {
        let settings = weekdays();
        assert!(settings.is_working_day(make_date("2026-01-15")));
        assert!(!settings.is_working_day(make_date("2026-01-17")));
    }

    #[test]
    fn test_holiday_on() {
        let mut settings = weekdays();
        settings.holidays.push(Holiday {
            name: "Founders Day".to_string(),
            start_date: make_date("2026-03-02"),
            end_date: make_date("2026-03-03"),
        });
        assert_eq!(
            settings.holiday_on(make_date("2026-03-03")).map(|h| h.name.as_str()),
            Some("Founders Day")
        );
        assert!(settings.holiday_on(make_date("2026-03-04")).is_none());
    }

    #[test]
    fn test_check_workable() {
        let mut settings = weekdays();
        settings.holidays.push(Holiday {
            name: "Founders Day".to_string(),
            start_date: make_date("2026-03-02"),
            end_date: make_date("2026-03-02"),
        });
        assert!(settings.check_workable(make_date("2026-03-03")).is_ok());
        assert!(matches!(
            settings.check_workable(make_date("2026-03-07")),
            Err(EngineError::NonWorkingDay { .. })
        ));
        assert!(matches!(
            settings.check_workable(make_date("2026-03-02")),
            Err(EngineError::Holiday { name, .. }) if name == "Founders Day"
        ));
    }

    #[test]
    fn test_ip_restriction() {
        let mut settings = weekdays();
        let office: IpAddr = "10.0.0.5".parse().unwrap();
        let home: IpAddr = "192.168.1.9".parse().unwrap();
        assert!(settings.permits_ip(None));

        settings.ip_restriction_enabled = true;
        settings.allowed_ips.push(office);
        assert!(settings.permits_ip(Some(office)));
        assert!(!settings.permits_ip(Some(home)));
        assert!(!settings.permits_ip(None));
    }

    #[test]
    fn test_deserialize_settings_from_yaml() {
        let yaml = r#"
employer_id: 4
working_days: [1, 2, 3, 4, 5]
ip_restriction_enabled: true
allowed_ips: ["10.0.0.1"]
holidays:
  - name: Labour Day
    start_date: 2026-05-01
    end_date: 2026-05-01
"#;
        let settings: EmployerSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.employer_id, 4);
        assert_eq!(settings.working_days.len(), 5);
        assert_eq!(settings.holidays[0].name, "Labour Day");
    }
}
