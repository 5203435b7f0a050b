//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::EmployerSettings;

use super::types::{EmployersConfig, EngineConfig, ReferenceData};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml     # Per-employer working days, IP allow-list, holidays
/// └── reference.yaml  # Shifts, employees, leave types, loans, overtime
/// ```
///
/// `reference.yaml` is optional; without it the store starts empty apart
/// from the employer settings.
///
/// # Example
///
/// ```no_run
/// use hrm_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let settings = loader.settings_for(1).unwrap();
/// println!("Working days: {:?}", settings.working_days);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - Any file contains invalid YAML
    /// - A working-day index is outside 0..=6
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let employers = Self::load_yaml::<EmployersConfig>(&engine_path)?.employers;
        Self::validate_working_days(&engine_path, &employers)?;

        let reference_path = path.join("reference.yaml");
        let reference = if reference_path.exists() {
            Self::load_yaml::<ReferenceData>(&reference_path)?
        } else {
            ReferenceData::default()
        };

        Ok(Self {
            config: EngineConfig::new(employers, reference),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_working_days(path: &Path, employers: &[EmployerSettings]) -> EngineResult<()> {
        for settings in employers {
            if let Some(day) = settings.working_days.iter().find(|day| **day > 6) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!(
                        "employer {}: working day index {} is outside 0..=6",
                        settings.employer_id, day
                    ),
                });
            }
        }
        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Gets the settings of one employer.
    ///
    /// Returns `NotFound` if the employer is not configured.
    pub fn settings_for(&self, employer_id: u64) -> EngineResult<&EmployerSettings> {
        self.config
            .employers()
            .iter()
            .find(|settings| settings.employer_id == employer_id)
            .ok_or(EngineError::NotFound {
                entity: "employer",
                id: employer_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn temp_config_dir(name: &str, engine_yaml: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("hrm-payroll-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("engine.yaml"), engine_yaml).unwrap();
        dir
    }

    #[test]
    fn test_load_default_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert!(!loader.config().employers().is_empty());
        assert!(!loader.config().reference().employees.is_empty());
    }

    #[test]
    fn test_default_employer_works_monday_to_friday() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let settings = loader.settings_for(1).unwrap();

        assert_eq!(settings.working_days, vec![1, 2, 3, 4, 5]);
        assert!(!settings.ip_restriction_enabled);
        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(settings.holiday_on(new_year).is_some());
    }

    #[test]
    fn test_unknown_employer_returns_not_found() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert!(matches!(
            loader.settings_for(999),
            Err(EngineError::NotFound { entity: "employer", id: 999 })
        ));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = temp_config_dir("invalid", "employers: [this is: not valid");
        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_out_of_range_working_day_rejected() {
        let dir = temp_config_dir(
            "weekday",
            "employers:\n  - employer_id: 1\n    working_days: [1, 7]\n",
        );
        let result = ConfigLoader::load(&dir);
        match result {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("working day index 7"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_reference_file_is_optional() {
        let dir = temp_config_dir(
            "no-reference",
            "employers:\n  - employer_id: 3\n    working_days: [0, 6]\n",
        );
        let loader = ConfigLoader::load(&dir).unwrap();
        assert!(loader.config().reference().employees.is_empty());
        assert_eq!(loader.settings_for(3).unwrap().working_days, vec![0, 6]);
        fs::remove_dir_all(dir).unwrap();
    }
}
