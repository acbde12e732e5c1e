//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/keywork/keywork.toml`
//! 3. Environment variables: `KEYWORK_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Chat-completion endpoint of the generation service
    pub generation_endpoint: String,
    /// Model name sent with every generation request
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-request timeout for generation calls
    pub request_timeout_secs: u64,
    /// Target language for the translation overlay
    pub target_language: String,
    /// Directory for the JSON persistence store
    pub data_dir: PathBuf,
    /// Workbench session file carried between CLI invocations
    pub session_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".keywork"));
        Self {
            generation_endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-haiku-4-5".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            request_timeout_secs: 120,
            target_language: "de".to_string(),
            session_file: data_dir.join("session.json"),
            data_dir,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "keywork")
}

/// Path of the global config file, if a config directory can be determined.
pub fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("keywork.toml"))
}

impl Settings {
    /// Load settings: defaults, then the global config file (if present),
    /// then `KEYWORK_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_file_path().as_deref())
    }

    /// Load settings with an explicit config file (used by tests).
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&Settings::default())?;
        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(Environment::with_prefix("KEYWORK"))
            .build()?
            .try_deserialize()
    }

    /// Render the current settings as a TOML document, used by `config init`
    /// to seed the global config file.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_file_when_loading_then_defaults_apply() {
        let settings = Settings::load_from(None).unwrap();
        assert_eq!(settings.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(settings.request_timeout_secs, 120);
    }

    #[test]
    fn given_settings_when_rendering_toml_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
