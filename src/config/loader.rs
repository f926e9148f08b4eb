//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "REFSCOPE_CONFIG";

/// Environment variable overriding the ref pane width.
pub const REF_PANE_WIDTH_ENV_VAR: &str = "REFSCOPE_REF_PANE_WIDTH";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/refscope/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Width of the ref pane in columns.
    #[serde(default)]
    pub ref_pane_width: Option<u16>,

    /// Disable colors.
    #[serde(default)]
    pub no_color: Option<bool>,

    /// Show the key binding help bar at the bottom.
    #[serde(default)]
    pub show_help_bar: Option<bool>,

    /// Default tracing level when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub ref_pane_width: u16,
    pub no_color: bool,
    pub show_help_bar: bool,
    pub log_level: String,
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            ref_pane_width: 32,
            no_color: false,
            show_help_bar: true,
            log_level: "info".to_string(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/refscope/refscope.log` on Linux, the platform
/// state directory elsewhere, or `refscope.log` in the current directory if
/// no state directory exists.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("refscope").join("refscope.log"),
        None => PathBuf::from("refscope.log"),
    }
}

/// Resolve default config file path.
///
/// Returns `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("refscope").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `REFSCOPE_CONFIG` environment variable
/// 3. Default path `~/.config/refscope/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        ref_pane_width: config.ref_pane_width.unwrap_or(defaults.ref_pane_width),
        no_color: config.no_color.unwrap_or(defaults.no_color),
        show_help_bar: config.show_help_bar.unwrap_or(defaults.show_help_bar),
        log_level: config.log_level.unwrap_or(defaults.log_level),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `REFSCOPE_REF_PANE_WIDTH`: ref pane width (ignored unless a number)
/// - `NO_COLOR`: any value disables colors
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(width) = std::env::var(REF_PANE_WIDTH_ENV_VAR)
        .ok()
        .and_then(|raw| raw.trim().parse::<u16>().ok())
    {
        config.ref_pane_width = width;
    }

    if std::env::var_os("NO_COLOR").is_some() {
        config.no_color = true;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Only flags that were explicitly set override earlier sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    ref_pane_width_override: Option<u16>,
    no_color_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(width) = ref_pane_width_override {
        config.ref_pane_width = width;
    }

    if let Some(no_color) = no_color_override {
        config.no_color = no_color;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
