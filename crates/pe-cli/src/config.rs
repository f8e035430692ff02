//! CLI configuration and settings management

use crate::{CliError, Result};
use pe_eval::EvalConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = "pure-eval.toml";
const HOME_CONFIG: &str = ".pure-eval.toml";
const APP_DIR: &str = "pure-eval";

/// CLI configuration loaded from config files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Evaluator settings
    pub evaluator: EvalConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Colorize terminal output
    pub color: bool,

    /// Render diagnostics in the plain `[context] LEVEL: message` form
    pub plain_diagnostics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            plain_diagnostics: false,
        }
    }
}

impl CliConfig {
    /// Load configuration from `config_path`, or from the first standard
    /// location that has a config file, falling back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        for candidate in Self::search_paths() {
            if candidate.is_file() {
                return Self::load_from_file(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Standard locations, most specific first: the current directory, the
    /// home directory, then the platform config directory.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(HOME_CONFIG));
        }
        if let Some(path) = Self::default_config_path() {
            paths.push(path);
        }
        paths
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| CliError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }
}
