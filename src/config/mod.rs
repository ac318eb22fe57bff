//! Configuration management for ClearPlate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::focus::FOCUS_ITEMS_KEY;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,

    /// Focus store configuration.
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// Loads global config first, then merges project-local config if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        let global_path = Self::config_path()?;
        let project_path = Self::project_config_path().ok();
        Self::load_from(&global_path, project_path.as_deref())
    }

    /// Load from explicit global and project-local paths. Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_from(global_path: &Path, project_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = if global_path.exists() {
            let contents = std::fs::read_to_string(global_path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Some(project_path) = project_path {
            if project_path.exists() {
                let contents = std::fs::read_to_string(project_path)?;
                let project_config: Self = toml::from_str(&contents)?;
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// Get the project-local configuration file path.
    ///
    /// Looks for `.clearplate/config.toml` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn project_config_path() -> anyhow::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(".clearplate").join("config.toml"))
    }

    /// Merge another config into this one (project overrides global).
    fn merge(&mut self, other: Self) {
        let api_defaults = ApiConfig::default();
        if other.api.port != api_defaults.port {
            self.api.port = other.api.port;
        }
        if other.api.host != api_defaults.host {
            self.api.host = other.api.host;
        }
        if other.api.token.is_some() {
            self.api.token = other.api.token;
        }

        let store_defaults = StoreConfig::default();
        if other.store.backend != store_defaults.backend {
            self.store.backend = other.store.backend;
        }
        if other.store.root.is_some() {
            self.store.root = other.store.root;
        }
        if other.store.key != store_defaults.key {
            self.store.key = other.store.key;
        }
        if other.store.strict_ids != store_defaults.strict_ids {
            self.store.strict_ids = other.store.strict_ids;
        }
    }

    /// Get the configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the config directory path (`~/.config/clearplate/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config_home).join("clearplate"));
        }

        if cfg!(target_os = "macos") {
            if let Ok(home) = std::env::var("HOME") {
                return Ok(PathBuf::from(home).join(".config").join("clearplate"));
            }
        }

        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

        Ok(base.config_dir().join("clearplate"))
    }

    /// Get the data directory path (`~/.local/share/clearplate/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn data_dir() -> anyhow::Result<PathBuf> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("could not determine data directory"))?;

        Ok(base.data_dir().join("clearplate"))
    }
}

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,

    /// Port to bind to.
    pub port: u16,

    /// API token for authentication (optional, but required for remote access).
    /// Can also be set via `CLEARPLATE_API_TOKEN` environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7891,
            token: None,
        }
    }
}

impl ApiConfig {
    /// Get the API token, preferring env var over config file.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        std::env::var("CLEARPLATE_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone())
    }

    /// Generate a new random API token.
    #[must_use]
    pub fn generate_token() -> String {
        use rand::Rng;
        let mut rng = rand::rng();
        let bytes: [u8; 32] = rng.random();
        format!("cp_{}", hex::encode(bytes))
    }
}

/// Where focus items are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON file under the storage root.
    #[default]
    File,
    /// Process memory; lost on exit.
    Memory,
}

/// Focus store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage backend.
    pub backend: StoreBackend,

    /// Storage root for the file backend (defaults to the data directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Blob key holding the focus collection.
    pub key: String,

    /// Reject duplicate focus item ids on replace and update.
    pub strict_ids: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            root: None,
            key: FOCUS_ITEMS_KEY.to_string(),
            strict_ids: false,
        }
    }
}

impl StoreConfig {
    /// Resolved storage root.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is configured and the data directory
    /// cannot be determined.
    pub fn root_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(Config::data_dir()?.join("storage")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.api.port, 7891);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.key, FOCUS_ITEMS_KEY);
        assert!(!config.store.strict_ids);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[store]
strict_ids = true
backend = "memory"
"#,
        )
        .unwrap();

        assert!(config.store.strict_ids);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.key, FOCUS_ITEMS_KEY);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn project_config_overrides_global() {
        let dir = tempfile::TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");

        std::fs::write(
            &global,
            r#"
[api]
port = 9000
token = "global-token"

[store]
root = "/var/lib/clearplate"
"#,
        )
        .unwrap();
        std::fs::write(
            &project,
            r#"
[store]
strict_ids = true
key = "project_focus"
"#,
        )
        .unwrap();

        let config = Config::load_from(&global, Some(&project)).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.token.as_deref(), Some("global-token"));
        assert_eq!(config.store.root, Some(PathBuf::from("/var/lib/clearplate")));
        assert_eq!(config.store.key, "project_focus");
        assert!(config.store.strict_ids);
    }

    #[test]
    fn missing_files_yield_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml"), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let global = dir.path().join("config.toml");
        std::fs::write(&global, "[store\nstrict_ids = ").unwrap();
        assert!(Config::load_from(&global, None).is_err());
    }

    #[test]
    fn explicit_root_is_used() {
        let config = StoreConfig {
            root: Some(PathBuf::from("/tmp/cp")),
            ..StoreConfig::default()
        };
        assert_eq!(config.root_dir().unwrap(), PathBuf::from("/tmp/cp"));
    }

    #[test]
    fn generated_token_format() {
        let token = ApiConfig::generate_token();
        assert!(token.starts_with("cp_"));
        assert_eq!(token.len(), 3 + 64);
        assert_ne!(token, ApiConfig::generate_token());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
