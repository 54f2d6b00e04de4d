// Configuration loading and validation (config/pipeline.toml).

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use boxscore_core::LineupConfig;
use boxscore_store::SUPPORTED_YEARS;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// pipeline.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub lineup: LineupSection,
    pub years: YearsSection,
    pub paths: PathsSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupSection {
    pub use_dh: bool,
    pub use_bullpen: bool,
    #[serde(default = "default_bullpen_size")]
    pub bullpen_size: usize,
}

fn default_bullpen_size() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct YearsSection {
    pub first: i32,
    pub last: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    pub data_dir: String,
    pub db_path: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_log_dir() -> String {
    "logs".into()
}

impl Config {
    pub fn lineup_config(&self) -> LineupConfig {
        LineupConfig {
            use_dh: self.lineup.use_dh,
            bullpen_size: self.lineup.use_bullpen.then_some(self.lineup.bullpen_size),
        }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.years.first..=self.years.last
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Relative location of the pipeline config under a base dir.
pub const CONFIG_FILE: &str = "config/pipeline.toml";
/// Shipped defaults, copied to [`CONFIG_FILE`] when it is missing.
pub const DEFAULTS_FILE: &str = "defaults/pipeline.toml";

/// Load and validate [`CONFIG_FILE`] under `base_dir`. Does not install
/// defaults; see [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Install [`DEFAULTS_FILE`] as [`CONFIG_FILE`] unless a config is already
/// there. Returns the installed path, or `None` when an existing config was
/// left alone.
pub fn install_default_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let defaults = base_dir.join(DEFAULTS_FILE);
    let text = std::fs::read_to_string(&defaults).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "no {CONFIG_FILE} and cannot read {}: {e}",
            defaults.display()
        ),
    })?;
    // the shipped defaults must parse before they become the user's config
    toml::from_str::<Config>(&text).map_err(|e| ConfigError::ParseError {
        path: defaults.clone(),
        source: e,
    })?;

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::write(&target, text).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;
    Ok(Some(target))
}

/// Load config relative to the current working directory, installing the
/// defaults on first run.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    install_default_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let supported = format!("{}-{}", SUPPORTED_YEARS.start(), SUPPORTED_YEARS.end());
    for (field, year) in [("years.first", config.years.first), ("years.last", config.years.last)] {
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: format!("must be within {supported}, got {year}"),
            });
        }
    }
    if config.years.first > config.years.last {
        return Err(ConfigError::ValidationError {
            field: "years.first".into(),
            message: format!(
                "must not be after years.last ({} > {})",
                config.years.first, config.years.last
            ),
        });
    }

    if config.lineup.use_bullpen && config.lineup.bullpen_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "lineup.bullpen_size".into(),
            message: "must be > 0 when use_bullpen is set".into(),
        });
    }

    for (field, value) in [
        ("paths.data_dir", &config.paths.data_dir),
        ("paths.db_path", &config.paths.db_path),
        ("paths.log_dir", &config.paths.log_dir),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
