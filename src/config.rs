// File: src/config.rs
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the engine config file.
pub const CONFIG_ENV: &str = "TSIMIGUNO_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "tsimiguno.json";

/// Engine settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Words per candidate batch.
    pub candidates_count: usize,
    pub min_length: usize,
    pub max_length: usize,
    /// Generated pool size per requested candidate.
    pub pool_multiplier: usize,
    /// Top-ranked window size per requested candidate.
    pub top_window_multiplier: usize,
    /// Share of each batch drawn from the top window, in percent (rounded up).
    pub exploit_percent: usize,
    /// Score that marks a word as a favourite.
    pub favorite_score: f64,
    /// Directory of per-user state files.
    pub data_dir: PathBuf,
    pub sgd: SgdConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidates_count: 10,
            min_length: 3,
            max_length: 8,
            pool_multiplier: 100,
            top_window_multiplier: 3,
            exploit_percent: 90,
            favorite_score: 1.0,
            data_dir: PathBuf::from("data"),
            sgd: SgdConfig::default(),
        }
    }
}

/// Online squared-loss linear regression settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    /// L2 regularisation strength.
    pub alpha: f64,
    /// Initial learning rate; decays as `eta0 / t^power_t`.
    pub eta0: f64,
    pub power_t: f64,
    /// Maximum passes over the training set.
    pub max_iter: usize,
    /// Stop once an epoch improves the loss by less than `tol * n_samples`...
    pub tol: f64,
    /// ...this many times in a row.
    pub n_iter_no_change: usize,
    /// Seeds the per-epoch sample shuffle.
    pub seed: u64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            eta0: 0.01,
            power_t: 0.25,
            max_iter: 1000,
            tol: 1e-3,
            n_iter_no_change: 5,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Loads `path` if it exists, defaults otherwise. A file that exists but
    /// does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let config = Self::from_json_file(path)?;
            info!(path = %path.display(), "loaded engine config");
            Ok(config)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Path from [`CONFIG_ENV`], falling back to [`DEFAULT_CONFIG_PATH`].
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}
