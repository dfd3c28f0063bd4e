//! Exception Records: a persisted YAML document identifying packages whose
//! matches should be suppressed from the verdict channel until an expiry
//! date, per §3/§4.3's exception suppression contract.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use vetter_core::{Ecosystem, PackageKey};

use crate::error::{AnalyzerError, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExceptionRecord {
    pub ecosystem: String,
    pub name: String,
    pub version: String,
    pub expires: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExceptionRecord {
    fn matches(&self, key: &PackageKey) -> bool {
        Ecosystem::parse(&self.ecosystem) == key.ecosystem
            && self.name == key.name
            && self.version == key.version
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct ExceptionsDocument {
    #[serde(default)]
    exceptions: Vec<ExceptionRecord>,
}

/// A loaded exceptions file, queried per-package at analysis time.
#[derive(Debug, Default, Clone)]
pub struct ExceptionSet {
    records: Vec<ExceptionRecord>,
}

impl ExceptionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let doc: ExceptionsDocument = serde_yaml::from_str(yaml)?;
        Ok(Self {
            records: doc.exceptions,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(AnalyzerError::Io)?;
        Self::from_yaml(&contents)
    }

    /// True if `key` is covered by an unexpired exception as of `today`.
    pub fn suppresses(&self, key: &PackageKey, today: NaiveDate) -> bool {
        self.records
            .iter()
            .any(|r| r.matches(key) && r.expires >= today)
    }

    pub fn write(path: &Path, records: &[ExceptionRecord]) -> Result<()> {
        let doc = ExceptionsDocument {
            exceptions: records.to_vec(),
        };
        let yaml = serde_yaml::to_string(&doc)?;
        std::fs::write(path, yaml).map_err(AnalyzerError::Io)?;
        Ok(())
    }

    /// The default exception window: today plus 90 days, evaluated once per
    /// invocation per the Design Notes' "today + 90 days" decision.
    pub fn default_expiry(today: NaiveDate) -> NaiveDate {
        Self::default_expiry_with_window(today, Self::DEFAULT_WINDOW_DAYS)
    }

    pub const DEFAULT_WINDOW_DAYS: i64 = 90;

    /// Like [`Self::default_expiry`] but with a caller-chosen window, per
    /// the configured `default exception window` setting.
    pub fn default_expiry_with_window(today: NaiveDate, window_days: i64) -> NaiveDate {
        today + chrono::Duration::days(window_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
exceptions:
  - ecosystem: pypi
    name: django
    version: 2.0.0
    expires: 2099-01-01
    reason: accepted risk
"#;

    fn key() -> PackageKey {
        PackageKey {
            ecosystem: Ecosystem::PyPI,
            name: "django".into(),
            version: "2.0.0".into(),
        }
    }

    #[test]
    fn unexpired_exception_suppresses_matching_package() {
        let set = ExceptionSet::from_yaml(YAML).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(set.suppresses(&key(), today));
    }

    #[test]
    fn expired_exception_does_not_suppress() {
        let set = ExceptionSet::from_yaml(YAML).unwrap();
        let today = NaiveDate::from_ymd_opt(2200, 1, 1).unwrap();
        assert!(!set.suppresses(&key(), today));
    }

    #[test]
    fn exception_for_a_different_package_does_not_suppress() {
        let set = ExceptionSet::from_yaml(YAML).unwrap();
        let other = PackageKey {
            ecosystem: Ecosystem::PyPI,
            name: "flask".into(),
            version: "1.0.0".into(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(!set.suppresses(&other, today));
    }

    #[test]
    fn default_expiry_is_ninety_days_out() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            ExceptionSet::default_expiry(today),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
        );
    }

    #[test]
    fn roundtrips_through_write_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.yaml");
        let record = ExceptionRecord {
            ecosystem: "npm".into(),
            name: "left-pad".into(),
            version: "1.3.0".into(),
            expires: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            reason: None,
        };
        ExceptionSet::write(&path, &[record]).unwrap();

        let loaded = ExceptionSet::load(&path).unwrap();
        let key = PackageKey {
            ecosystem: Ecosystem::Npm,
            name: "left-pad".into(),
            version: "1.3.0".into(),
        };
        assert!(loaded.suppresses(&key, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }
}
