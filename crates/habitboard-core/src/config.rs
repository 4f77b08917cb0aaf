//! Run configuration: Habitify API key plus the TRMNL webhook identity.
//!
//! Values come from the environment first (the scheduled-job path), then
//! from `~/.config/habitboard/config.toml`. Set HABITBOARD_ENV=dev to use
//! the `habitboard-dev` data directory instead.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, CoreError};

const HABITIFY_API_KEY: &str = "HABITIFY_API_KEY";
const TRMNL_PLUGIN_ID: &str = "TRMNL_PLUGIN_ID";
const TRMNL_API_KEY: &str = "TRMNL_API_KEY";

/// Returns `~/.config/habitboard[-dev]/`, creating it if needed.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitboard-dev")
    } else {
        base_dir.join("habitboard")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Optional file-backed values, all overridable by environment variables
/// of the same (upper-cased) name.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    habitify_api_key: Option<String>,
    #[serde(default)]
    trmnl_plugin_id: Option<String>,
    #[serde(default)]
    trmnl_api_key: Option<String>,
}

impl ConfigFile {
    fn load(path: &PathBuf) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| {
                    ConfigError::ParseFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                    .into()
                })
            }
            Err(_) => Ok(Self::default()),
        }
    }
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub habitify_api_key: String,
    pub trmnl_plugin_id: Option<String>,
    pub trmnl_api_key: Option<String>,
}

impl Config {
    /// Resolve from environment and config file. The Habitify key is
    /// always required; the webhook pair only when delivering.
    pub fn load() -> Result<Self, CoreError> {
        let file = ConfigFile::load(&data_dir()?.join("config.toml"))?;

        let habitify_api_key = std::env::var(HABITIFY_API_KEY)
            .ok()
            .or(file.habitify_api_key)
            .ok_or_else(|| ConfigError::MissingKey(HABITIFY_API_KEY.to_string()))?;

        Ok(Self {
            habitify_api_key,
            trmnl_plugin_id: std::env::var(TRMNL_PLUGIN_ID).ok().or(file.trmnl_plugin_id),
            trmnl_api_key: std::env::var(TRMNL_API_KEY).ok().or(file.trmnl_api_key),
        })
    }

    /// The webhook identity, required for delivery.
    pub fn webhook(&self) -> Result<(&str, &str), ConfigError> {
        let plugin_id = self
            .trmnl_plugin_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingKey(TRMNL_PLUGIN_ID.to_string()))?;
        let token = self
            .trmnl_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingKey(TRMNL_API_KEY.to_string()))?;
        Ok((plugin_id, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_parses_partial_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "habitify_api_key = \"abc\"\n").unwrap();

        let file = ConfigFile::load(&path).unwrap();
        assert_eq!(file.habitify_api_key.as_deref(), Some("abc"));
        assert!(file.trmnl_plugin_id.is_none());
    }

    #[test]
    fn missing_config_file_is_empty_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = ConfigFile::load(&tmp.path().join("nope.toml")).unwrap();
        assert!(file.habitify_api_key.is_none());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "habitify_api_key = [broken\n").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn webhook_pair_is_required_together() {
        let config = Config {
            habitify_api_key: "k".into(),
            trmnl_plugin_id: Some("p".into()),
            trmnl_api_key: None,
        };
        assert!(matches!(
            config.webhook(),
            Err(ConfigError::MissingKey(ref key)) if key == "TRMNL_API_KEY"
        ));

        let config = Config {
            trmnl_api_key: Some("t".into()),
            ..config
        };
        assert_eq!(config.webhook().unwrap(), ("p", "t"));
    }
}
