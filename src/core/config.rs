use crate::core::aggregate::ScopeClassifier;
use crate::core::builder::{DEFAULT_RECENT_TRANSACTIONS, ViewModelBuilder};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_fixture_delay_ms() -> u64 {
    220
}

fn default_retries() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_recent_transactions() -> usize {
    DEFAULT_RECENT_TRANSACTIONS
}

/// Where the dashboard snapshot comes from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Fixture {
        #[serde(default = "default_fixture_delay_ms")]
        delay_ms: u64,
    },
    Http {
        base_url: String,
        account_id: Option<String>,
        period: Option<String>,
        #[serde(default = "default_retries")]
        retries: usize,
        #[serde(default = "default_retry_delay_ms")]
        retry_delay_ms: u64,
    },
    File {
        path: String,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Fixture {
            delay_ms: default_fixture_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_recent_transactions")]
    pub recent_transactions: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            recent_transactions: default_recent_transactions(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ClassificationConfig {
    #[serde(default)]
    pub professional_categories: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no config file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "capwise", "capwise")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn view_model_builder(&self) -> ViewModelBuilder {
        ViewModelBuilder::new(
            self.display.recent_transactions,
            ScopeClassifier::new(&self.classification.professional_categories),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
source:
  kind: http
  base_url: "https://api.example.com"
  account_id: "acct-42"
  period: "2025-09"
  retries: 5
display:
  recent_transactions: 3
classification:
  professional_categories: ["Freelance", "Services"]
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.source,
            SourceConfig::Http {
                base_url: "https://api.example.com".to_string(),
                account_id: Some("acct-42".to_string()),
                period: Some("2025-09".to_string()),
                retries: 5,
                retry_delay_ms: 500,
            }
        );
        assert_eq!(config.display.recent_transactions, 3);
        assert_eq!(
            config.classification.professional_categories,
            vec!["Freelance".to_string(), "Services".to_string()]
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.source, SourceConfig::Fixture { delay_ms: 220 });
        assert_eq!(config.display.recent_transactions, 10);
        assert!(config.classification.professional_categories.is_empty());
    }

    #[test]
    fn test_file_source_and_partial_sections() {
        let yaml_str = r#"
source:
  kind: file
  path: "/tmp/snapshot.yaml"
display: {}
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::File {
                path: "/tmp/snapshot.yaml".to_string()
            }
        );
        assert_eq!(config.display.recent_transactions, 10);
    }

    #[test]
    fn test_unknown_source_kind_is_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("source:\n  kind: carrier-pigeon\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load_from_path(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
