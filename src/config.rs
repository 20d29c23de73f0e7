//! Configuration management for the DevDocs language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - The optional user config file
//! - Workspace settings sent by the editor
//! - Base URL resolution for each lookup

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use serde::Deserialize;

use crate::error::LookupError;

/// Documentation site used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://devdocs.io";

/// Workspace configuration section requested from the editor.
pub const SETTINGS_SECTION: &str = "devdocs";

/// Command-line arguments for the DevDocs language server
#[derive(Debug, Parser)]
#[command(name = "devdocs-language-server")]
#[command(about = "Language server that opens DevDocs lookups for the selected word")]
#[command(version)]
pub struct Args {
    /// Base URL of the documentation site
    #[arg(long, help = "Documentation site base URL (default: https://devdocs.io)")]
    pub base_url: Option<String>,

    /// Path of the config file
    #[arg(long, help = "Config file (default: <config dir>/devdocs-ls/config.toml)")]
    pub config: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from the command line and the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL passed on the command line
    pub cli_base_url: Option<String>,
    /// Config file consulted on every lookup, if any
    pub config_file: Option<PathBuf>,
    /// Log level
    pub log_level: String,
}

/// Contents of the user config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: String,
}

/// The `devdocs` workspace settings section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Custom base URL; empty means "not set"
    pub url: String,
}

impl Settings {
    /// Parse the section value returned by `workspace/configuration`.
    ///
    /// `null` or a malformed section yields the defaults.
    pub fn from_value(value: serde_json::Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed '{}' settings: {}", SETTINGS_SECTION, e);
            Self::default()
        })
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let config_file = args
            .config
            .or_else(|| dirs::config_dir().map(|dir| dir.join("devdocs-ls").join("config.toml")));

        Ok(Config {
            cli_base_url: args.base_url.filter(|url| !url.is_empty()),
            config_file,
            log_level: args.log_level,
        })
    }

    /// Resolve the base URL for one lookup.
    ///
    /// The first non-empty value wins: workspace setting, command line, config
    /// file, built-in default. The config file is read fresh every time.
    pub fn resolve_base_url(&self, settings: &Settings) -> String {
        if !settings.url.is_empty() {
            return settings.url.clone();
        }
        if let Some(url) = &self.cli_base_url {
            return url.clone();
        }
        if let Some(path) = &self.config_file {
            match load_file_config(path) {
                Ok(Some(file)) if !file.base_url.is_empty() => return file.base_url,
                Ok(_) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
        DEFAULT_BASE_URL.to_string()
    }
}

/// Load the config file; a missing file is not an error.
pub fn load_file_config(path: &Path) -> Result<Option<FileConfig>, LookupError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| LookupError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| LookupError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
