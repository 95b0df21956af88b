//! Config Module - typed config files with environment overrides
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`load_with_env` only): `PREFIX_SECTION_KEY`
//! 2. Config file: first `<dir>/<name>.<ext>` across the search paths
//! 3. `T::default()`
//!
//! A missing file is not an error. A file that does not parse, or that puts
//! a value of the wrong type into a field, is [`KitError::Config`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::copier::{self, CopyError, CopyOptions, KeyPolicy};
use crate::error::{KitError, Result};

/// Config file syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// File extensions tried, in order
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
            ConfigFormat::Json => &["json"],
        }
    }

    fn parse(&self, content: &str) -> std::result::Result<Value, String> {
        match self {
            ConfigFormat::Toml => toml::from_str::<Value>(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => {
                if content.trim().is_empty() {
                    return Ok(Value::Object(Default::default()));
                }
                serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string())
            }
            ConfigFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = KitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(ConfigFormat::Toml),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(KitError::ConfigFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extensions()[0])
    }
}

/// First existing `<dir>/<name>.<ext>` in search order
pub fn find_config_file<P: AsRef<Path>>(
    name: &str,
    format: ConfigFormat,
    search_paths: &[P],
) -> Option<PathBuf> {
    search_paths.iter().find_map(|dir| {
        format
            .extensions()
            .iter()
            .map(|ext| dir.as_ref().join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
    })
}

/// Load `T` from defaults and the first matching config file
pub fn load<T, P>(name: &str, format: ConfigFormat, search_paths: &[P]) -> Result<T>
where
    T: DeserializeOwned + Serialize + Default,
    P: AsRef<Path>,
{
    let tree = load_tree::<T, P>(name, format, search_paths)?;
    into_config(tree)
}

/// Like [`load`], then let environment variables override any leaf.
///
/// The variable for `server.port` with prefix parts `["APP", "V1"]` is
/// `APP_V1_SERVER_PORT`. Values are parsed as the type the leaf already
/// holds (bool, integer, float, array, string).
pub fn load_with_env<T, P>(
    name: &str,
    format: ConfigFormat,
    search_paths: &[P],
    prefix_parts: &[&str],
) -> Result<T>
where
    T: DeserializeOwned + Serialize + Default,
    P: AsRef<Path>,
{
    let mut tree = load_tree::<T, P>(name, format, search_paths)?;
    let prefix: Vec<&str> = prefix_parts.iter().copied().filter(|p| !p.is_empty()).collect();
    apply_env(&mut tree, &prefix.join("_"), "")?;
    into_config(tree)
}

fn load_tree<T, P>(name: &str, format: ConfigFormat, search_paths: &[P]) -> Result<Value>
where
    T: Serialize + Default,
    P: AsRef<Path>,
{
    let mut tree = serde_json::to_value(T::default())?;

    let Some(path) = find_config_file(name, format, search_paths) else {
        debug!(name, %format, "no config file found, using defaults");
        return Ok(tree);
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        KitError::config(format!("failed to read '{}': {e}", path.display()))
    })?;
    let file_tree = format
        .parse(&content)
        .map_err(|e| KitError::config(format!("failed to parse '{}': {e}", path.display())))?;

    let opts = CopyOptions::default().with_strict(true);
    copier::merge_values(&mut tree, &file_tree, KeyPolicy::Open, &opts).map_err(|e| match e {
        CopyError::StructuralCopy { path: field, expected, found } => KitError::config(format!(
            "'{}': field '{field}' expects {expected}, found {found}",
            path.display()
        )),
        other => KitError::Copy(other),
    })?;

    debug!(path = %path.display(), "config file loaded");
    Ok(tree)
}

fn into_config<T: DeserializeOwned>(tree: Value) -> Result<T> {
    serde_json::from_value(tree).map_err(|e| KitError::config(format!("invalid config: {e}")))
}

fn env_key(prefix: &str, path: &str) -> String {
    let key = if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{prefix}_{path}")
    };
    key.replace('.', "_").to_uppercase()
}

fn apply_env(node: &mut Value, prefix: &str, path: &str) -> Result<()> {
    if let Value::Object(map) = node {
        for (key, child) in map.iter_mut() {
            let child_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{path}.{key}")
            };
            apply_env(child, prefix, &child_path)?;
        }
        return Ok(());
    }

    let var = env_key(prefix, path);
    if let Ok(raw) = std::env::var(&var) {
        *node = coerce_env(node, &raw)
            .ok_or_else(|| KitError::config(format!(
                "env {var}: cannot parse '{raw}' as {}",
                copier::kind(node)
            )))?;
        debug!(var, "config value overridden from environment");
    }
    Ok(())
}

/// Parse `raw` as the same JSON kind `current` holds
fn coerce_env(current: &Value, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    match current {
        Value::Bool(_) => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(n) if n.is_f64() => raw.parse::<f64>().ok().map(Value::from),
        Value::Number(n) if n.is_u64() => raw
            .parse::<u64>()
            .ok()
            .map(Value::from)
            .or_else(|| raw.parse::<i64>().ok().map(Value::from)),
        Value::Number(_) => raw.parse::<i64>().ok().map(Value::from),
        Value::Array(_) => {
            if raw.starts_with('[') {
                serde_json::from_str(raw).ok()
            } else {
                Some(Value::Array(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(Value::from)
                        .collect(),
                ))
            }
        }
        // Unset optional fields: take JSON scalars as-is, anything else as text
        Value::Null => Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw))),
        Value::String(_) | Value::Object(_) => Some(Value::from(raw)),
    }
}
