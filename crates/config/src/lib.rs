//! Configuration loading, validation, env substitution, and env overrides.
//!
//! Config files: `seedstream.toml`, `seedstream.yaml`, or `seedstream.json`
//! Searched in `./` then `~/.config/seedstream/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, load_config, load_from},
    schema::{AddonConfig, SeedrConfig, SeedstreamConfig, ServerConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
