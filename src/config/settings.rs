//! TOML-based configuration for sqlom.
//!
//! Example configuration:
//! ```toml
//! [render]
//! dialect = "sqlserver"
//! table_space = "${APP_SCHEMA}"
//!
//! [[mappings]]
//! record_type = "Customer"
//! table_name = "customers"
//! table_alias = "c"
//! columns = [
//!     { property = "Id", column = "id" },
//!     { property = "Name", column = "full_name" },
//!     { property = "Cache", column = "cache", ignored = true },
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::mapping::{MappingRegistry, TableMapping};
use crate::sql::dialect::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,

    /// Record type mappings.
    pub mappings: Vec<TableMapping>,
}

/// Rendering defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Dialect used when the command line names none.
    pub dialect: Dialect,

    /// Namespace applied to statements without one (supports ${ENV_VAR} expansion).
    pub table_space: Option<String>,
}

impl RenderSettings {
    /// The table space with environment variables expanded.
    pub fn resolved_table_space(&self) -> Result<Option<String>, SettingsError> {
        self.table_space.as_deref().map(expand_env_vars).transpose()
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.check()?;
        tracing::debug!(path = %path.display(), mappings = settings.mappings.len(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLOM_CONFIG`
    /// 2. `./sqlom.toml`
    ///
    /// Falls back to defaults when neither exists.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SQLOM_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqlom.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(Settings::default())
    }

    /// Mappings collected into a registry.
    pub fn mapping_registry(&self) -> MappingRegistry {
        self.mappings.iter().cloned().collect()
    }

    fn check(&self) -> Result<(), SettingsError> {
        for (i, mapping) in self.mappings.iter().enumerate() {
            if mapping.record_type.is_empty() || mapping.table_name.is_empty() {
                return Err(SettingsError::InvalidConfig(format!(
                    "mapping #{} needs both record_type and table_name",
                    i + 1
                )));
            }
            if self.mappings[..i]
                .iter()
                .any(|m| m.record_type == mapping.record_type)
            {
                return Err(SettingsError::InvalidConfig(format!(
                    "record type '{}' is mapped twice",
                    mapping.record_type
                )));
            }
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name = chars.by_ref().take_while(|&ch| ch != '}').collect();
            name
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // a lone $ is kept
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
