use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings consumed by the compile pipeline.
///
/// ```toml
/// profile_name = "users"
/// literal_comparison_fields = ["name", "email"]
/// strict = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    /// Fields a bare literal is compared against, in output order.
    pub literal_comparison_fields: Vec<String>,
    /// Reject input left over after a complete query.
    pub strict: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            literal_comparison_fields: vec!["title".to_string(), "email".to_string()],
            strict: false,
        }
    }
}

impl CompilerConfig {
    /// Replaces the fan-out fields when `fields` is given.
    pub fn with_fields(mut self, fields: Option<Vec<String>>) -> Self {
        if let Some(fields) = fields {
            self.literal_comparison_fields = fields;
        }
        self
    }

    /// Turns strict mode on; never turns it off.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict |= strict;
        self
    }
}

pub fn load_config(path: Option<&Path>) -> Result<CompilerConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<CompilerConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<CompilerConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static CompilerConfig {
    static DEFAULT_CONFIG: LazyLock<CompilerConfig> = LazyLock::new(CompilerConfig::default);
    &DEFAULT_CONFIG
}
