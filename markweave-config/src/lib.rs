//! Shared configuration loader for the markweave toolchain.
//!
//! `defaults/markweave.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`MarkweaveConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use markweave::Schema;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/markweave.default.toml");

/// Top-level configuration consumed by markweave applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkweaveConfig {
    pub schema: SchemaConfig,
    pub output: OutputConfig,
}

/// Describes the flat model the toolchain targets.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    pub top_node: String,
    pub text_node: String,
    pub mark_order: Vec<String>,
}

impl From<SchemaConfig> for Schema {
    fn from(config: SchemaConfig) -> Self {
        Schema::new(config.top_node, config.text_node, config.mark_order)
    }
}

impl From<&SchemaConfig> for Schema {
    fn from(config: &SchemaConfig) -> Self {
        Schema::new(
            config.top_node.clone(),
            config.text_node.clone(),
            config.mark_order.iter().cloned(),
        )
    }
}

/// Output knobs for the command-line tools.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MarkweaveConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarkweaveConfig, ConfigError> {
    Loader::new().build()
}
