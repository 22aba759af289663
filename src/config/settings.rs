//! TOML-based project configuration.
//!
//! A project file (pipeql.toml) declares datasources and pipes, with
//! `${VAR}` environment variable expansion applied before parsing.
//!
//! Example configuration:
//! ```toml
//! [datasources.events]
//! version = 1
//! engine = { kind = "MergeTree", sorting_key = ["ts", "id"], ttl = "${EVENTS_TTL}" }
//!
//! [datasources.events.columns]
//! id = { type = "String" }
//! ts = { type = "DateTime", json_path = "$.timestamp" }
//!
//! [pipes.by_id]
//! sql = "SELECT * FROM events WHERE id = {{ String(id) }}"
//! params = { id = { type = "String" } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::emit::DatasourceDef;
use crate::pipe::PipeDef;

/// Environment variable pointing at the project file.
pub const CONFIG_ENV_VAR: &str = "PIPEQL_CONFIG";

/// Project file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pipeql.toml";

/// Error type for project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unterminated variable reference starting at byte {0}")]
    UnterminatedVar(usize),

    #[error("Invalid definition `{name}`: {reason}")]
    InvalidDefinition { name: String, reason: String },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Project {
    /// Datasources by name, in declaration order.
    pub datasources: IndexMap<String, DatasourceDef>,

    /// Pipes by name, in declaration order.
    pub pipes: IndexMap<String, PipeDef>,
}

impl FromStr for Project {
    type Err = ConfigError;

    /// Parse a project from TOML text, expanding `${VAR}` references first.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let expanded = expand_env_vars(content)?;
        let project: Project = toml::from_str(&expanded)?;
        project.validate()?;
        Ok(project)
    }
}

impl Project {
    /// Load a project from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), "loading project");
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Load the project from the default locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `PIPEQL_CONFIG`
    /// 2. `./pipeql.toml`
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }
        Self::from_file(DEFAULT_CONFIG_FILE)
    }

    /// Check definitions that parse but cannot produce an artifact.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, def) in &self.datasources {
            if def.columns.is_empty() {
                return Err(ConfigError::InvalidDefinition {
                    name: name.clone(),
                    reason: "datasource has no columns".to_string(),
                });
            }
        }
        for (name, def) in &self.pipes {
            if def.sql.as_deref().map_or(true, |sql| sql.trim().is_empty()) {
                return Err(ConfigError::InvalidDefinition {
                    name: name.clone(),
                    reason: "pipe has no sql body".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.datasources.is_empty() && self.pipes.is_empty()
    }
}

/// Expand `${VAR}` environment variable references in a string.
///
/// Only the braced form is recognised so that JSONPaths such as `$.id`
/// pass through untouched.
pub fn expand_env_vars(s: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    let mut offset = 0;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::UnterminatedVar(offset + start));
        };
        let var_name = &after[..end];
        let value =
            env::var(var_name).map_err(|_| ConfigError::MissingEnvVar(var_name.to_string()))?;
        result.push_str(&value);

        let consumed = start + 2 + end + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    result.push_str(rest);

    Ok(result)
}
