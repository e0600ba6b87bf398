//! Configuration handling for the onboarding TUI

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::wizard::Route;

/// Overrides `submit_delay_ms`
pub const SUBMIT_DELAY_ENV: &str = "ONBOARD_SUBMIT_DELAY_MS";

const DEFAULT_SUBMIT_DELAY_MS: u64 = 600;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OnboardConfig {
    /// Translation file merged over the embedded English catalog
    pub locale_override_path: Option<PathBuf>,
    /// Simulated latency of the local submission backend
    pub submit_delay_ms: Option<u64>,
    /// Submission targets the local backend rejects (`/step4`, `application`)
    pub fail_targets: Option<Vec<String>>,
    /// Page shown at start-up
    pub start_route: Option<String>,
}

impl OnboardConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "onboard", "onboard-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user config file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(std::env::var(SUBMIT_DELAY_ENV).ok().as_deref());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing config from {}", path.display()))
    }

    /// Write the defaults where the config file is expected, unless one exists
    pub fn init_file() -> Result<()> {
        match Self::config_path() {
            Some(path) if !path.exists() => Self::default().save_to(&path),
            _ => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Unparseable values are ignored with a warning
    fn apply_env(&mut self, submit_delay: Option<&str>) {
        if let Some(raw) = submit_delay {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.submit_delay_ms = Some(ms),
                Err(_) => tracing::warn!(value = raw, "ignoring invalid {SUBMIT_DELAY_ENV}"),
            }
        }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms.unwrap_or(DEFAULT_SUBMIT_DELAY_MS))
    }

    /// Configured start page, falling back to registration
    pub fn start_route(&self) -> Route {
        self.start_route
            .as_deref()
            .and_then(Route::parse)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::StepId;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("onboard-tui-test-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_default_config() {
        let config = OnboardConfig::default();
        assert!(config.locale_override_path.is_none());
        assert!(config.submit_delay_ms.is_none());
        assert!(config.fail_targets.is_none());
        assert!(config.start_route.is_none());
        assert_eq!(config.submit_delay(), Duration::from_millis(600));
        assert_eq!(config.start_route(), Route::Register);
    }

    #[test]
    fn test_serialization() {
        let config = OnboardConfig {
            locale_override_path: Some(PathBuf::from("/tmp/es.json")),
            submit_delay_ms: Some(0),
            fail_targets: Some(vec!["/step4".to_string()]),
            start_route: Some("/step2".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: OnboardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.start_route(), Route::Step(StepId::Licensing));
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: OnboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, OnboardConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"submit_delay_ms": 10, "unknown_field": "value"}"#;
        let parsed: OnboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.submit_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_unknown_start_route_falls_back() {
        let config = OnboardConfig {
            start_route: Some("/nowhere".to_string()),
            ..Default::default()
        };
        assert_eq!(config.start_route(), Route::Register);
    }

    #[test]
    fn test_env_override() {
        let mut config = OnboardConfig {
            submit_delay_ms: Some(600),
            ..Default::default()
        };
        config.apply_env(Some("25"));
        assert_eq!(config.submit_delay_ms, Some(25));

        config.apply_env(Some("soon"));
        assert_eq!(config.submit_delay_ms, Some(25));

        config.apply_env(None);
        assert_eq!(config.submit_delay_ms, Some(25));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_config_path("config.json");
        let config = OnboardConfig {
            fail_targets: Some(vec!["application".to_string()]),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(OnboardConfig::load_from(&path).unwrap(), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_from_malformed_file_errors() {
        let path = temp_config_path("broken.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(OnboardConfig::load_from(&path).is_err());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_returns_ok() {
        // Passes whether or not a user config file exists
        assert!(OnboardConfig::load().is_ok());
    }
}
