/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load Syn-Crew-Core configuration from TOML with sane
    defaults for every field, covering the remote roster API
    endpoint and local log placement.

  Security / Safety Notes:
    Configuration is read from operator-controlled paths only;
    no credentials are stored or expected.

  Dependencies:
    serde + toml for parsing, dirs for platform default paths.

  Operational Scope:
    Consumed once at startup by the CLI boundary.

  Revision History:
    2025-06-19 COD  Authored configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults; absent config file is not an error
    - Misread explicit paths fail loudly
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ErrorFactory, Result};

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CrewConfig {
    pub api: ApiConfig,
    pub paths: PathsConfig,
}

/// Remote roster API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout in seconds. Timeouts classify as network
    /// failures with a distinguishing code; they never hang.
    pub timeout: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".to_string(),
            timeout: 10,
            user_agent: "Syn-Crew-Core/0.4 (linux)".to_string(),
        }
    }
}

/// Local filesystem settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    pub log_dir: Option<PathBuf>,
}

impl CrewConfig {
    /// Load configuration from an explicit path, or from the default
    /// location when none is given. An absent default file yields the
    /// built-in defaults; an absent explicit file is an error.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let factory = ErrorFactory::new();
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|err| {
                    factory.validation(
                        format!("Failed to read config {}: {err}", path.display()),
                        None,
                        None,
                    )
                })?;
                Self::parse(&raw, path)
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => {
                    let raw = std::fs::read_to_string(&path).map_err(|err| {
                        factory.validation(
                            format!("Failed to read config {}: {err}", path.display()),
                            None,
                            None,
                        )
                    })?;
                    Self::parse(&raw, &path)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    fn parse(raw: &str, origin: &Path) -> Result<Self> {
        toml::from_str(raw).map_err(|err| {
            ErrorFactory::new().validation(
                format!("Invalid config {}: {err}", origin.display()),
                None,
                None,
            )
        })
    }

    /// Default config location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("syn-crew").join("config.toml"))
    }

    /// Directory receiving session logs.
    pub fn log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.paths.log_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("syn-crew").join("logs"))
            .unwrap_or_else(std::env::temp_dir)
    }
}
