// src/config/loader.rs
//! Layered TOML configuration loader
//!
//! Files are merged in order, later files overriding earlier ones key by key,
//! on top of [`OnOffConfig::default`]. Environment variables prefixed with
//! `EMG_ONOFF__` are applied last, with `__` separating nested keys
//! (`EMG_ONOFF__SEGMENTATION__MSD_ON_S=0.04`).

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::OnOffConfig;

const ENV_PREFIX: &str = "EMG_ONOFF__";
const ENV_SEPARATOR: &str = "__";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),
    #[error("configuration parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Loads [`OnOffConfig`] from a stack of TOML files
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create loader with custom paths, merged in the given order
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: false,
        }
    }

    /// Also apply `EMG_ONOFF__*` environment overrides
    pub fn with_environment(mut self) -> Self {
        self.use_environment = true;
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load and merge every configured file. Missing files are skipped.
    pub fn load(&self) -> Result<OnOffConfig, ConfigError> {
        let mut merged = toml::Value::try_from(OnOffConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        for path in &self.config_paths {
            match Self::load_config_file(path) {
                Ok(overlay) => {
                    debug!(path = %path.display(), "merging configuration file");
                    merge_toml_values(&mut merged, overlay);
                }
                Err(ConfigError::FileNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        if self.use_environment {
            apply_overrides(&mut merged, std::env::vars());
        }

        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))
    }

    /// Parse a single TOML document; missing keys take default values
    pub fn from_toml_str(content: &str) -> Result<OnOffConfig, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Write a configuration as pretty TOML
    pub fn export<P: AsRef<Path>>(config: &OnOffConfig, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn load_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(path) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let parts: Vec<String> = path
            .split(ENV_SEPARATOR)
            .map(|p| p.to_lowercase())
            .collect();
        debug!(key = %key, "applying environment override");
        set_nested_value(config, &parts, parse_env_value(&value));
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_nested_value(config: &mut toml::Value, parts: &[String], value: toml::Value) {
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = config;
    for part in parents {
        let toml::Value::Table(table) = current else {
            return;
        };
        current = table
            .entry(part.clone())
            .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
    }

    if let toml::Value::Table(table) = current {
        // Integers given for float fields must stay floats or deserialization fails
        let value = match (table.get(last), value) {
            (Some(toml::Value::Float(_)), toml::Value::Integer(i)) => toml::Value::Float(i as f64),
            (_, v) => v,
        };
        table.insert(last.clone(), value);
    }
}
