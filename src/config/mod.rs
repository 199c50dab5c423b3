//! Configuration module for sqlom.
//!
//! Handles the `sqlom.toml` file: rendering defaults and record mappings.

mod settings;

pub use settings::{expand_env_vars, RenderSettings, Settings, SettingsError};
