/*!
 * Arena Configuration
 *
 * Capacity ceiling, growth policy and pressure thresholds, with environment
 * overrides and JSON file loading
 */

use super::errors::ConfigError;
use super::limits::{
    ABSOLUTE_MAX_CAPACITY, DEFAULT_CRITICAL_THRESHOLD, DEFAULT_GROWTH_FACTOR,
    DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CAPACITY, DEFAULT_WARNING_THRESHOLD, MIN_GROWTH_FACTOR,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `initial_capacity`
pub const ENV_INITIAL_CAPACITY: &str = "ARENA_INITIAL_CAPACITY";
/// Environment variable overriding `max_capacity`
pub const ENV_MAX_CAPACITY: &str = "ARENA_MAX_CAPACITY";
/// Environment variable overriding `growth_factor`
pub const ENV_GROWTH_FACTOR: &str = "ARENA_GROWTH_FACTOR";

/// Arena configuration
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Bytes reserved at creation (0 grows on first use)
    pub initial_capacity: usize,
    /// Ceiling the backing buffer may never grow past
    pub max_capacity: usize,
    /// Multiplier for capacity growth
    pub growth_factor: usize,
    /// Live/ceiling ratio that triggers pressure warnings
    pub warning_threshold: f64,
    /// Live/ceiling ratio considered critical
    pub critical_threshold: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

impl ArenaConfig {
    /// Default config seeded with `initial_capacity`
    ///
    /// The ceiling is raised to the seed if the seed is larger.
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        let defaults = Self::default();
        Self {
            initial_capacity,
            max_capacity: defaults.max_capacity.max(initial_capacity),
            ..defaults
        }
    }

    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Defaults with `ARENA_*` environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Apply `ARENA_*` environment overrides on top of `self`
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(value) = read_env_usize(ENV_INITIAL_CAPACITY)? {
            self.initial_capacity = value;
        }
        if let Some(value) = read_env_usize(ENV_MAX_CAPACITY)? {
            self.max_capacity = value;
        }
        if let Some(value) = read_env_usize(ENV_GROWTH_FACTOR)? {
            self.growth_factor = value;
        }
        self.validate()?;
        Ok(self)
    }

    /// Load a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a JSON config string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings describe a usable arena
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.growth_factor < MIN_GROWTH_FACTOR {
            return Err(ConfigError::Invalid(format!(
                "growth_factor must be at least {}, got {}",
                MIN_GROWTH_FACTOR, self.growth_factor
            )));
        }
        if self.max_capacity > ABSOLUTE_MAX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "max_capacity {} exceeds the absolute limit {}",
                self.max_capacity, ABSOLUTE_MAX_CAPACITY
            )));
        }
        if self.initial_capacity > self.max_capacity {
            return Err(ConfigError::Invalid(format!(
                "initial_capacity {} exceeds max_capacity {}",
                self.initial_capacity, self.max_capacity
            )));
        }
        let valid_ratio = |r: f64| r > 0.0 && r <= 1.0;
        if !valid_ratio(self.warning_threshold) || !valid_ratio(self.critical_threshold) {
            return Err(ConfigError::Invalid(
                "pressure thresholds must be in (0, 1]".to_string(),
            ));
        }
        if self.warning_threshold > self.critical_threshold {
            return Err(ConfigError::Invalid(format!(
                "warning_threshold {} is above critical_threshold {}",
                self.warning_threshold, self.critical_threshold
            )));
        }
        Ok(())
    }
}

fn read_env_usize(var: &'static str) -> Result<Option<usize>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
        Err(_) => Ok(None),
    }
}
