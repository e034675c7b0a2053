//! Configuration loading and management
//!
//! Handles parsing of `.taskflow.toml` configuration files. A missing or
//! unreadable config resolves to defaults; configuration never blocks
//! startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

const CONFIG_FILENAME: &str = ".taskflow.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Auth configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Presentation configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory (defaults to the platform data dir)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Auth-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token lifetime stamped at issuance, in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    24
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// Presentation-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Artificial pause before mutating commands, in milliseconds.
    /// Emulates the original client's request latency; 0 disables it.
    #[serde(default)]
    pub simulate_latency_ms: u64,
}

impl Config {
    /// Load configuration from `<dir>/.taskflow.toml`, falling back to
    /// defaults when the file is missing or malformed.
    pub fn load_from_dir(dir: &Path) -> Config {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Config::default();
        }

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read config; using defaults");
                return Config::default();
            }
        };

        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to parse config; using defaults");
                Config::default()
            }
        }
    }

    /// Save configuration to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Resolve the data directory: explicit override, then config, then
    /// the platform-specific data dir, then `.taskflow` under the cwd.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }
        if let Some(dir) = &self.storage.dir {
            return dir.clone();
        }
        if let Some(dirs) = directories::ProjectDirs::from("", "", "taskflow") {
            return dirs.data_dir().to_path_buf();
        }
        PathBuf::from(".taskflow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from_dir(dir.path());

        assert!(config.storage.dir.is_none());
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.ui.simulate_latency_ms, 0);
    }

    #[test]
    fn overrides_from_toml() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let toml = r#"
[storage]
dir = "/tmp/taskflow-data"

[auth]
token_ttl_hours = 48

[ui]
simulate_latency_ms = 300
"#;
        std::fs::write(dir.path().join(".taskflow.toml"), toml)?;

        let config = Config::load_from_dir(dir.path());
        assert_eq!(
            config.storage.dir.as_deref(),
            Some(Path::new("/tmp/taskflow-data"))
        );
        assert_eq!(config.auth.token_ttl_hours, 48);
        assert_eq!(config.ui.simulate_latency_ms, 300);
        Ok(())
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(".taskflow.toml"), "not [valid toml").unwrap();

        let config = Config::load_from_dir(dir.path());
        assert_eq!(config.auth.token_ttl_hours, 24);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config {
            storage: StorageConfig {
                dir: Some(PathBuf::from("/from/config")),
            },
            ..Config::default()
        };

        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/explicit"))),
            PathBuf::from("/explicit")
        );
        assert_eq!(
            config.resolve_data_dir(None),
            PathBuf::from("/from/config")
        );
    }
}
