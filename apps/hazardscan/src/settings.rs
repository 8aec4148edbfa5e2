//! # Application Settings
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. TOML file: `--config <path>` (must exist), else `hazardscan.toml` in the
//!    working directory if present, else built-in defaults
//! 2. Environment: `HAZARDSCAN_RESULTS_DIR`
//! 3. CLI flags: `--results-dir`
//!
//! ```toml
//! results_dir = "results"
//! default_experiment = "exp2"
//! stage2_dump_limit = 16
//! engine = "classical"
//! workers = 4
//! ```

use hazardscan_core::{Experiment, HazardError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "hazardscan.toml";

/// Environment variable overriding `results_dir`.
pub const RESULTS_DIR_ENV: &str = "HAZARDSCAN_RESULTS_DIR";

/// Engine label written into metrics artifacts.
pub const ENGINE_CLASSICAL: &str = "classical";

/// Maximum settings file size (64 KB).
const MAX_SETTINGS_FILE_SIZE: u64 = 64 * 1024;

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory receiving JSON artifacts.
    pub results_dir: PathBuf,
    /// Experiment used when a command does not name one.
    pub default_experiment: Experiment,
    /// Number of stage-2 unsafe inputs dumped by `run --stage 2`.
    pub stage2_dump_limit: usize,
    /// Engine label recorded in metrics artifacts.
    pub engine: String,
    /// Enumeration threads when `--workers` is not given.
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            default_experiment: Experiment::Exp1,
            stage2_dump_limit: 16,
            engine: ENGINE_CLASSICAL.to_string(),
            workers: 1,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, HazardError> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| HazardError::ConfigError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self, HazardError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            HazardError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        if metadata.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(HazardError::ConfigError(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                metadata.len(),
                MAX_SETTINGS_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| HazardError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Load the file layer: an explicit path must exist, the default file is
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, HazardError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_SETTINGS_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply environment overrides through `lookup`.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(RESULTS_DIR_ENV).filter(|d| !d.is_empty()) {
            self.results_dir = PathBuf::from(dir);
        }
        self
    }

    /// All three layers: file, process environment, CLI flag.
    pub fn resolve(
        explicit: Option<&Path>,
        results_dir_flag: Option<PathBuf>,
    ) -> Result<Self, HazardError> {
        let mut settings =
            Self::load(explicit)?.with_env_overrides(|key| std::env::var(key).ok());
        if let Some(dir) = results_dir_flag {
            settings.results_dir = dir;
        }
        Ok(settings)
    }

    fn validate(&self) -> Result<(), HazardError> {
        if self.engine.trim().is_empty() {
            return Err(HazardError::ConfigError("engine must not be empty".to_string()));
        }
        if self.workers == 0 {
            return Err(HazardError::ConfigError("workers must be at least 1".to_string()));
        }
        Ok(())
    }
}
