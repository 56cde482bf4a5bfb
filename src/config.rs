//! Engine tunables from an optional `config.json`.
//!
//! Missing or malformed configuration never fails engine construction;
//! defaults apply and a warning is logged.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::history::DEFAULT_CAPACITY;
use crate::stroke::JITTER_THRESHOLD_PX;

const APP_DIR: &str = "inklay";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum undoable history entries before the oldest is evicted.
    pub history_capacity: usize,
    /// Cumulative movement (px) before a pointer-down counts as a stroke.
    pub jitter_threshold_px: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            jitter_threshold_px: JITTER_THRESHOLD_PX,
        }
    }
}

pub fn load_config() -> EngineConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EngineConfig {
    let path = match config_path(APP_DIR, CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return EngineConfig::default(),
    };
    if !path.exists() {
        return EngineConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EngineConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EngineConfig::default()
        }
    }
}

fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home {
        return Ok(xdg.to_path_buf());
    }
    match home {
        Some(home) => Ok(home.join(".config")),
        None => Err(ConfigPathError::MissingHomeDirectory),
    }
}
