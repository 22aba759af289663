//! Configuration module.
//!
//! Loads project files declaring datasources and pipes.

mod settings;

pub use settings::{
    expand_env_vars, ConfigError, Project, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE,
};
