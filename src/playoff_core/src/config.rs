use chrono::{Datelike, NaiveDate};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_HOME_COURT_ADV, DEFAULT_K_FACTOR, DEFAULT_RATING, DEFAULT_SEED,
    DEFAULT_SIMULATIONS,
};
use crate::error::{PlayoffError, Result};

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Rating model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Rating points moved per unit of surprise
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    /// Rating points added to the home side
    #[serde(default = "default_home_court_adv")]
    pub home_court_adv: f64,
    /// Baseline for teams without games
    #[serde(default = "default_initial_rating")]
    pub initial_rating: f64,
    /// What to do with malformed game records
    #[serde(default)]
    pub on_invalid_game: InvalidGamePolicy,
}

fn default_k_factor() -> f64 {
    DEFAULT_K_FACTOR
}

fn default_home_court_adv() -> f64 {
    DEFAULT_HOME_COURT_ADV
}

fn default_initial_rating() -> f64 {
    DEFAULT_RATING
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            home_court_adv: DEFAULT_HOME_COURT_ADV,
            initial_rating: DEFAULT_RATING,
            on_invalid_game: InvalidGamePolicy::default(),
        }
    }
}

/// Caller policy for a `GameResult` that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidGamePolicy {
    /// Stop the fold and return the error
    #[default]
    Abort,
    /// Log the record and continue without it
    Skip,
}

/// Monte Carlo parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulated postseasons
    #[serde(default = "default_trials")]
    pub trials: u64,
    /// Master seed; `None` draws one from entropy
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,
    /// Trials per parallel task
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

fn default_trials() -> u64 {
    DEFAULT_SIMULATIONS
}

fn default_seed() -> Option<u64> {
    Some(DEFAULT_SEED)
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_SIMULATIONS,
            seed: Some(DEFAULT_SEED),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `config/` and the environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> std::result::Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Deployment overrides (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("PLAYOFF_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // PLAYOFF_MODEL__K_FACTOR, PLAYOFF_SIMULATION__TRIALS, ...
            .add_source(
                Environment::with_prefix("PLAYOFF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Reject configurations that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.simulation.validate()
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.k_factor.is_finite() && self.k_factor > 0.0) {
            return Err(PlayoffError::InvalidConfiguration(format!(
                "k_factor must be a positive real, got {}",
                self.k_factor
            )));
        }
        if !self.home_court_adv.is_finite() {
            return Err(PlayoffError::InvalidConfiguration(format!(
                "home_court_adv must be finite, got {}",
                self.home_court_adv
            )));
        }
        if !self.initial_rating.is_finite() {
            return Err(PlayoffError::InvalidConfiguration(format!(
                "initial_rating must be finite, got {}",
                self.initial_rating
            )));
        }
        Ok(())
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(PlayoffError::InvalidConfiguration(
                "trials must be greater than 0".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(PlayoffError::InvalidConfiguration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Season label for a date: seasons start in October and are named by the
/// year they end in.
pub fn infer_season(today: NaiveDate) -> i32 {
    if today.month() < 10 {
        today.year()
    } else {
        today.year() + 1
    }
}
