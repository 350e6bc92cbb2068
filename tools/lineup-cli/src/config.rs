//! CLI configuration: one TOML file carrying `[logging]` next to the
//! selection policy, then `LINEUP_*` environment overrides.

use anyhow::{anyhow, Context, Result};
use lineup_engine::SelectionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the CLI reads from configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub logging: LoggingConfig,

    /// Selection policy, read from the top level of the same file
    #[serde(flatten)]
    pub selection: SelectionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

impl CliConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration")
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from file: {:?}", path);
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };

        if let Some(level) = lookup("LINEUP_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = lookup("LINEUP_LOG_FORMAT") {
            config.logging.format = format;
        }
        config.selection.apply_overrides(lookup)?;

        Ok(config)
    }

    /// Validate after every override has been applied
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow!("Invalid log level: {}", self.logging.level)),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => {}
            _ => return Err(anyhow!("Invalid log format: {}", self.logging.format)),
        }

        self.selection.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = CliConfig::load_with(None, no_env).unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_mixes_logging_and_selection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            formations = ["4-4-2"]

            [logging]
            level = "debug"
            format = "json"

            [squad]
            budget_cap = 95.5
            max_per_club = 2
            "#
        )
        .unwrap();

        let config = CliConfig::load_with(Some(file.path()), no_env).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.selection.squad.budget_cap, 95.5);
        assert_eq!(config.selection.squad.max_per_club, 2);
        assert_eq!(config.selection.formations.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([("LINEUP_LOG_LEVEL", "warn"), ("LINEUP_BUDGET_CAP", "88")]);
        let config = CliConfig::load_with(None, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.selection.squad.budget_cap, 88.0);
    }

    #[test]
    fn test_unparsable_override_is_an_error() {
        let result = CliConfig::load_with(None, |key| {
            (key == "LINEUP_MAX_PER_CLUB").then(|| "three".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = CliConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.selection.squad.max_per_club = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load_with(Some(&dir.path().join("none.toml")), no_env).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
