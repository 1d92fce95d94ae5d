use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::SeedstreamConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "seedstream.toml",
    "seedstream.yaml",
    "seedstream.yml",
    "seedstream.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<SeedstreamConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Load config from an explicit path, or discover it when `path` is `None`.
///
/// Discovery searches `./seedstream.{toml,yaml,yml,json}`, then the same
/// names in [`config_dir`]. An explicit path that cannot be loaded is an
/// error; a discovered one falls back to defaults. Env overrides are applied
/// in both cases.
pub fn load_from(path: Option<&Path>) -> Result<SeedstreamConfig> {
    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(path)?
        },
        None => discover(&search_dirs()),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Directories searched in order: the working directory, then the user one.
fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    dirs.extend(config_dir());
    dirs
}

fn discover(dirs: &[PathBuf]) -> SeedstreamConfig {
    if let Some(path) = find_config_file(dirs) {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    SeedstreamConfig::default()
}

/// First existing config file, trying every file name in a directory before
/// moving to the next one.
fn find_config_file(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/seedstream/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "seedstream").map(|d| d.config_dir().to_path_buf())
}

/// Apply environment variable overrides on top of file values.
///
/// | variable           | field                 |
/// |--------------------|-----------------------|
/// | `PORT`             | `server.port`         |
/// | `SEEDSTREAM_BIND`  | `server.bind`         |
/// | `SEEDR_TOKEN`      | `seedr.token`         |
/// | `SEEDR_CLIENT_ID`  | `seedr.client_id`     |
/// | `SEEDR_DEVICE_URL` | `seedr.device_url`    |
/// | `SEEDR_TOKEN_URL`  | `seedr.token_url`     |
/// | `SEEDR_API_BASE`   | `seedr.api_base`      |
pub fn apply_env_overrides(config: &mut SeedstreamConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut SeedstreamConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(port) = lookup("PORT") {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!(value = %port, error = %e, "ignoring invalid PORT"),
        }
    }
    if let Some(v) = lookup("SEEDSTREAM_BIND") {
        config.server.bind = v;
    }
    if let Some(v) = lookup("SEEDR_TOKEN") {
        config.seedr.token = Some(Secret::new(v));
    }
    if let Some(v) = lookup("SEEDR_CLIENT_ID") {
        config.seedr.client_id = v;
    }
    if let Some(v) = lookup("SEEDR_DEVICE_URL") {
        config.seedr.device_url = v;
    }
    if let Some(v) = lookup("SEEDR_TOKEN_URL") {
        config.seedr.token_url = v;
    }
    if let Some(v) = lookup("SEEDR_API_BASE") {
        config.seedr.api_base = v;
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<SeedstreamConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat(ext.to_string())),
    }
}
