//! Global configuration.
//!
//! Loaded once per invocation from `~/.config/terminus-hotfix/config.json`,
//! with environment variable overrides taking precedence.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.pantheon.io/v0";

pub const ENV_API_URL: &str = "TERMINUS_HOTFIX_API_URL";
pub const ENV_MACHINE_TOKEN: &str = "TERMINUS_MACHINE_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub machine_token: Option<String>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    Error::internal_io(e.to_string(), Some(path.display().to_string()))
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    Error::config_invalid_value(
                        path.display().to_string(),
                        format!("not valid JSON: {}", e),
                    )
                })?
            }
            _ => Config::default(),
        };

        config.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_MACHINE_TOKEN).ok(),
        );
        Ok(config)
    }

    /// Environment variables take precedence over file values.
    fn apply_overrides(&mut self, api_base_url: Option<String>, machine_token: Option<String>) {
        if let Some(url) = api_base_url {
            self.api_base_url = Some(url);
        }
        if let Some(token) = machine_token {
            self.machine_token = Some(token);
        }
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn machine_token(&self) -> Result<&str> {
        self.machine_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(Error::config_missing_token)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("terminus-hotfix").join("config.json"))
}
