//! Configuration Loader
//!
//! Locates `openai.json` and parses it into a validated [`ConfigSet`].

use crate::config::set::ConfigSet;
use crate::error::{BridgeError, Result};
use std::path::{Path, PathBuf};

/// Environment variable pointing at a config file
pub const CONFIG_PATH_ENV: &str = "OPENAI_BRIDGE_CONFIG";

/// Configuration loader
pub struct ConfigLoader {
    config: ConfigSet,
}

impl ConfigLoader {
    /// Load `.env`, then the first config file found in the default locations
    pub fn new() -> Result<Self> {
        // A missing .env is normal
        let _ = dotenvy::dotenv();

        let path = Self::get_config_paths()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                BridgeError::Config(format!(
                    "No openai.json found. Set {} or create ./openai.json",
                    CONFIG_PATH_ENV
                ))
            })?;

        Self::from_path(path)
    }

    /// Create a loader from a specific config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::parse(&content).map_err(|e| {
            BridgeError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            connections = config.connections.len(),
            "Loaded OpenAI configuration"
        );

        Ok(Self { config })
    }

    /// Create a loader from an in-memory JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config = Self::parse(json).map_err(|e| {
            BridgeError::Config(format!("Failed to parse configuration: {}", e))
        })?;

        Ok(Self { config })
    }

    fn parse(json: &str) -> std::result::Result<ConfigSet, serde_json::Error> {
        let mut config: ConfigSet = serde_json::from_str(json)?;
        config.expand_env();
        Ok(config)
    }

    /// Get list of config paths to check, in priority order
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Environment variable
        if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(custom_path));
        }

        // 2. Current directory
        paths.push(PathBuf::from("openai.json"));

        // 3. User config directory
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("openai-bridge").join("openai.json"));
        }

        // 4. Home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".openai-bridge").join("openai.json"));
        }

        paths
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ConfigSet {
        &self.config
    }

    /// Take ownership of the configuration
    pub fn into_config(self) -> ConfigSet {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_custom_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "default": "prod",
                "prod": {{
                    "driver": "open_ai",
                    "api_key": "sk-prod",
                    "organization": "org-prod"
                }}
            }}"#
        )
        .unwrap();

        let loader = ConfigLoader::from_path(file.path()).unwrap();
        let prod = loader.config().connection("prod").unwrap();
        assert_eq!(prod.api_key(), Some("sk-prod"));
        assert_eq!(prod.organization.as_deref(), Some("org-prod"));
    }

    #[test]
    fn test_env_keys_expanded_on_load() {
        std::env::set_var("OPENAI_BRIDGE_LOADER_KEY", "sk-env");

        let loader = ConfigLoader::from_json(
            r#"{"default": "prod", "prod": {"driver": "open_ai", "api_key": "env:OPENAI_BRIDGE_LOADER_KEY"}}"#,
        )
        .unwrap();

        let config = loader.into_config();
        assert_eq!(config.connection("prod").unwrap().api_key(), Some("sk-env"));
    }

    #[test]
    fn test_env_path_searched_first() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"default": "env-conn", "env-conn": {{"driver": "open_ai", "api_key": "sk-env-path"}}}}"#
        )
        .unwrap();
        std::env::set_var(CONFIG_PATH_ENV, file.path());

        let paths = ConfigLoader::get_config_paths();
        assert_eq!(paths[0], file.path());
        assert_eq!(paths[1], PathBuf::from("openai.json"));

        let config = ConfigLoader::new().unwrap().into_config();
        assert_eq!(config.default, "env-conn");
        assert_eq!(
            config.connection("env-conn").unwrap().api_key(),
            Some("sk-env-path")
        );

        std::env::remove_var(CONFIG_PATH_ENV);
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::from_path("/nonexistent/openai.json")
            .err()
            .unwrap();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/openai.json"));
    }

    #[test]
    fn test_invalid_json_names_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = ConfigLoader::from_path(file.path()).err().unwrap();
        assert!(err.to_string().starts_with("Configuration error: Failed to parse"));
    }
}
