//! Configuration file management for holding detection.
//!
//! Reads/writes `~/.holding-detect/config.yaml` with engine settings and the
//! navigation catalog path.

use std::path::{Path, PathBuf};

use crate::filter::FlightFilter;
use crate::types::{HoldingError, Result};

/// Default half-size (degrees) of the cleaning window around the last sample.
pub const DEFAULT_CHECK_DISTANCE: f64 = 0.5;

/// Default filter list, comma-separated.
pub const DEFAULT_FILTERS: &str = "aircraft_type,short_flight";

/// Full configuration structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub engine: EngineConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub check_distance: f64,
    /// Comma-separated filter names, applied in order.
    pub filters: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogConfig {
    /// JSON navigation catalog; `None` runs without one.
    pub path: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            check_distance: DEFAULT_CHECK_DISTANCE,
            filters: DEFAULT_FILTERS.into(),
        }
    }
}

impl EngineConfig {
    /// Parsed filter list. Unknown names are an error.
    pub fn filter_list(&self) -> Result<Vec<FlightFilter>> {
        FlightFilter::parse_list(&self.filters)
    }
}

/// Get the config directory path (`~/.holding-detect/`).
pub fn config_dir() -> PathBuf {
    dirs_home().join(".holding-detect")
}

/// Get the config file path.
pub fn config_file() -> PathBuf {
    config_dir().join("config.yaml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Load config from `~/.holding-detect/config.yaml`.
///
/// Returns default config if file doesn't exist.
pub fn load_config() -> Config {
    load_config_from(&config_file())
}

/// Load config from an explicit path, falling back to defaults.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(text) => parse_config(&text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
            Config::default()
        }
    }
}

/// Save config to `~/.holding-detect/config.yaml`.
pub fn save_config(config: &Config) -> Result<PathBuf> {
    let path = config_file();
    save_config_to(config, &path)?;
    Ok(path)
}

/// Save config to an explicit path, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| HoldingError::Config(e.to_string()))?;
    }
    std::fs::write(path, serialize_config(config))
        .map_err(|e| HoldingError::Config(e.to_string()))
}

/// Parse simple YAML-like config text. Unknown keys and unparsable values are
/// ignored.
pub fn parse_config(text: &str) -> Config {
    let mut config = Config::default();
    let mut current_section: Option<String> = None;

    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }

        let is_indented = line.starts_with("  ") || line.starts_with('\t');

        if let Some((key, val)) = stripped.split_once(':') {
            let key = key.trim();
            let val = val.trim();

            if !is_indented {
                current_section = val.is_empty().then(|| key.to_string());
                continue;
            }

            match (current_section.as_deref(), key) {
                (Some("engine"), "check_distance") => {
                    if let Some(v) = parse_float_value(val) {
                        config.engine.check_distance = v;
                    }
                }
                (Some("engine"), "filters") => {
                    config.engine.filters = parse_string_value(val).unwrap_or_default();
                }
                (Some("catalog"), "path") => config.catalog.path = parse_string_value(val),
                _ => {}
            }
        }
    }

    config
}

fn parse_string_value(val: &str) -> Option<String> {
    if val == "null" || val == "~" || val.is_empty() {
        return None;
    }
    // Strip quotes
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        return Some(val[1..val.len() - 1].to_string());
    }
    Some(val.to_string())
}

fn parse_float_value(val: &str) -> Option<f64> {
    if val == "null" || val == "~" || val.is_empty() {
        return None;
    }
    val.parse().ok()
}

/// Serialize config to YAML-like text.
pub fn serialize_config(config: &Config) -> String {
    let mut lines = vec!["# holding-detect configuration".to_string(), String::new()];

    lines.push("engine:".into());
    lines.push(format!("  check_distance: {}", config.engine.check_distance));
    lines.push(format!("  filters: \"{}\"", config.engine.filters));
    lines.push(String::new());

    lines.push("catalog:".into());
    match &config.catalog.path {
        Some(p) => lines.push(format!("  path: \"{p}\"")),
        None => lines.push("  path: null".into()),
    }

    lines.join("\n") + "\n"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
