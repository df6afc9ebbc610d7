pub mod types;
pub mod validate;

pub use types::*;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Deployment environment from `APP_ENV` (`sandbox` when unset).
pub fn get_environment() -> String {
    std::env::var("APP_ENV")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "sandbox".to_string())
}

/// Load the analyzer config from a JSON file.
///
/// Keys missing from the file keep their defaults, and so do keys whose
/// value has the wrong shape. Only an unreadable file or malformed JSON is
/// an error. Environment overrides and [`validate::sanitize`] run last.
///
/// | Env Var                  | Config Field             |
/// |--------------------------|--------------------------|
/// | `SIGNAL_SCORE_THRESHOLD` | `signal_score_threshold` |
/// | `ATR_CHANGE_THRESHOLD`   | `atr_change_threshold`   |
/// | `ANALYSIS_INTERVAL`      | `analysis_interval`      |
pub fn load_config(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = config_from_str(&raw)?;
    apply_env_overrides(&mut config);
    validate::sanitize(&mut config);

    info!(path = %path.display(), interval = %config.interval, "config loaded");
    Ok(config)
}

/// Parse a JSON document and merge it over the defaults. No env overrides,
/// no sanitizing.
pub fn config_from_str(raw: &str) -> Result<AnalyzerConfig, ConfigError> {
    let user: Value = serde_json::from_str(raw)?;
    Ok(merge_over_defaults(user))
}

/// Merge a user document over [`AnalyzerConfig::default`] one key at a time.
pub fn merge_over_defaults(user: Value) -> AnalyzerConfig {
    let defaults = AnalyzerConfig::default();
    let mut merged = match serde_json::to_value(&defaults) {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "failed to serialize default config");
            return defaults;
        }
    };

    let Value::Object(user) = user else {
        warn!("config root is not an object, using defaults");
        return defaults;
    };

    for (key, value) in user {
        let section_keys: Option<Vec<String>> = match merged.get(&key) {
            None => {
                debug!(key = %key, "unknown config key ignored");
                continue;
            }
            Some(Value::Object(section)) => Some(section.keys().cloned().collect()),
            Some(_) => None,
        };

        match (section_keys, value) {
            (Some(known), Value::Object(children)) => {
                let open_keys = matches!(key.as_str(), "weight_sets" | "indicators");
                for (child, child_value) in children {
                    if !open_keys && !known.contains(&child) {
                        debug!(key = %format!("{key}.{child}"), "unknown config key ignored");
                        continue;
                    }
                    try_assign(&mut merged, &[key.as_str(), child.as_str()], child_value);
                }
            }
            (_, value) => try_assign(&mut merged, &[key.as_str()], value),
        }
    }

    match serde_json::from_value(merged) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "merged config failed to deserialize, using defaults");
            defaults
        }
    }
}

/// Set `path` to `value` only if the whole document still deserializes.
fn try_assign(merged: &mut Value, path: &[&str], value: Value) {
    let mut candidate = merged.clone();
    let Some(slot) = slot_mut(&mut candidate, path) else {
        return;
    };
    *slot = value;

    match serde_json::from_value::<AnalyzerConfig>(candidate.clone()) {
        Ok(_) => *merged = candidate,
        Err(e) => warn!(
            key = %path.join("."),
            error = %e,
            "invalid config value, keeping default"
        ),
    }
}

fn slot_mut<'a>(root: &'a mut Value, path: &[&str]) -> Option<&'a mut Value> {
    let (last, parents) = path.split_last()?;
    let mut node = root;
    for key in parents {
        node = node.as_object_mut()?.get_mut(*key)?;
    }
    let object: &mut Map<String, Value> = node.as_object_mut()?;
    Some(object.entry(last.to_string()).or_insert(Value::Null))
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

pub fn apply_env_overrides(config: &mut AnalyzerConfig) {
    apply_overrides(config, env_string);
}

fn apply_overrides<F>(config: &mut AnalyzerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("SIGNAL_SCORE_THRESHOLD").and_then(|v| Decimal::from_str(&v).ok()) {
        info!(%val, "env override: SIGNAL_SCORE_THRESHOLD");
        config.signal_score_threshold = val;
    }

    if let Some(val) = lookup("ATR_CHANGE_THRESHOLD").and_then(|v| Decimal::from_str(&v).ok()) {
        info!(%val, "env override: ATR_CHANGE_THRESHOLD");
        config.atr_change_threshold = val;
    }

    if let Some(val) = lookup("ANALYSIS_INTERVAL").and_then(|v| v.parse::<u64>().ok()) {
        info!(val, "env override: ANALYSIS_INTERVAL");
        config.analysis_interval = val;
    }
}

/// Read a non-empty env var as a `String`.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
