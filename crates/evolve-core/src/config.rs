//! Configuration loading and typed config structures for the Evolve engine.
//!
//! The canonical configuration lives in `evolve-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads, overrides, and validates it.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::Deserialize;

use evolve_population::EvolutionParams;
use evolve_population::config::{
    DEFAULT_MAX_POPULATION, DEFAULT_MUTATION_RATE, DEFAULT_SELECTION_PRESSURE,
};

/// Environment variable overriding `evolution.mutation_rate`.
pub const ENV_MUTATION_RATE: &str = "EVOLVE_MUTATION_RATE";
/// Environment variable overriding `evolution.max_population`.
pub const ENV_MAX_POPULATION: &str = "EVOLVE_MAX_POPULATION";
/// Environment variable overriding `evolution.cycle_interval_ms`.
pub const ENV_CYCLE_INTERVAL_MS: &str = "EVOLVE_CYCLE_INTERVAL_MS";
/// Environment variable overriding `evolution.seed`.
pub const ENV_SEED: &str = "EVOLVE_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for environment variable {key}")]
    EnvOverride {
        /// Variable name.
        key: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },

    /// A value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `evolve-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvolveConfig {
    /// Evolution tuning (rates, bounds, timing, seed).
    #[serde(default)]
    pub evolution: EvolutionConfig,

    /// Run bounds.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EvolveConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `EVOLVE_MUTATION_RATE` overrides `evolution.mutation_rate`
    /// - `EVOLVE_MAX_POPULATION` overrides `evolution.max_population`
    /// - `EVOLVE_CYCLE_INTERVAL_MS` overrides `evolution.cycle_interval_ms`
    /// - `EVOLVE_SEED` overrides `evolution.seed`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::EnvOverride`] or [`ConfigError::Invalid`] if the
    /// resulting values are unusable.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// See [`from_file`](Self::from_file).
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.evolution.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let evolution = &self.evolution;
        if !(0.0..=1.0).contains(&evolution.mutation_rate) {
            return Err(ConfigError::Invalid(format!(
                "evolution.mutation_rate must be in [0, 1], got {}",
                evolution.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&evolution.selection_pressure) {
            return Err(ConfigError::Invalid(format!(
                "evolution.selection_pressure must be in [0, 1], got {}",
                evolution.selection_pressure
            )));
        }
        if evolution.max_population == 0 {
            return Err(ConfigError::Invalid(String::from(
                "evolution.max_population must be positive",
            )));
        }
        Ok(())
    }

    /// Parameters consumed by the population passes.
    pub const fn evolution_params(&self) -> EvolutionParams {
        EvolutionParams {
            mutation_rate: self.evolution.mutation_rate,
            max_population: self.evolution.max_population,
            selection_pressure: self.evolution.selection_pressure,
        }
    }
}

/// Evolution tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvolutionConfig {
    /// Per-cycle mutation probability per organism.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,

    /// Live population bound.
    #[serde(default = "default_max_population")]
    pub max_population: usize,

    /// Real-time milliseconds between cycles.
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: u64,

    /// Fraction of the population culled per cycle, scaled by 0.1.
    #[serde(default = "default_selection_pressure")]
    pub selection_pressure: f64,

    /// RNG seed for reproducible runs. Unseeded runs draw from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EvolutionConfig {
    /// Apply `EVOLVE_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvOverride`] if a set variable does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvOverride`] if a present value does not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(rate) = parse_override(&lookup, ENV_MUTATION_RATE)? {
            self.mutation_rate = rate;
        }
        if let Some(max) = parse_override(&lookup, ENV_MAX_POPULATION)? {
            self.max_population = max;
        }
        if let Some(ms) = parse_override(&lookup, ENV_CYCLE_INTERVAL_MS)? {
            self.cycle_interval_ms = ms;
        }
        if let Some(seed) = parse_override(&lookup, ENV_SEED)? {
            self.seed = Some(seed);
        }
        Ok(())
    }
}

fn parse_override<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::EnvOverride { key, value: raw })
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: default_mutation_rate(),
            max_population: default_max_population(),
            cycle_interval_ms: default_cycle_interval_ms(),
            selection_pressure: default_selection_pressure(),
            seed: None,
        }
    }
}

/// Run bounds. A value of 0 means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of cycles after which the scheduler stops itself.
    #[serde(default)]
    pub max_cycles: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_mutation_rate() -> f64 {
    DEFAULT_MUTATION_RATE
}

const fn default_max_population() -> usize {
    DEFAULT_MAX_POPULATION
}

const fn default_cycle_interval_ms() -> u64 {
    5000
}

const fn default_selection_pressure() -> f64 {
    DEFAULT_SELECTION_PRESSURE
}

fn default_log_level() -> String {
    String::from("info")
}
