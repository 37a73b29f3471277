//! Run parameters with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via [`MinerConfig::apply_overrides`])
//! 2. TOML file (`--config <path>`)
//! 3. Compiled defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MiningError};

pub const DEFAULT_MIN_SUPPORT: f64 = 0.01;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.2;
pub const DEFAULT_MAX_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Smallest support, in (0, 1], an itemset needs to be kept.
    pub min_support: f64,
    /// Smallest confidence, in [0, 1], a rule needs to be kept.
    pub min_confidence: f64,
    /// Longest itemset to mine.
    pub max_len: usize,
    pub itemsets_output: PathBuf,
    pub rules_output: PathBuf,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_len: DEFAULT_MAX_LEN,
            itemsets_output: PathBuf::from("frequent_itemsets.csv"),
            rules_output: PathBuf::from("association_rules.csv"),
        }
    }
}

/// Values given on the command line; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub min_support: Option<f64>,
    pub min_confidence: Option<f64>,
    pub max_len: Option<usize>,
    pub itemsets_output: Option<PathBuf>,
    pub rules_output: Option<PathBuf>,
}

impl MinerConfig {
    /// Resolves defaults, then `file`, then `overrides`, and validates the
    /// result.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(min_support) = overrides.min_support {
            self.min_support = min_support;
        }
        if let Some(min_confidence) = overrides.min_confidence {
            self.min_confidence = min_confidence;
        }
        if let Some(max_len) = overrides.max_len {
            self.max_len = max_len;
        }
        if let Some(path) = &overrides.itemsets_output {
            self.itemsets_output = path.clone();
        }
        if let Some(path) = &overrides.rules_output {
            self.rules_output = path.clone();
        }
    }

    pub fn validate(&self) -> Result<(), MiningError> {
        validate_parameters(self.min_support, self.min_confidence, self.max_len)
    }
}

/// Checks the mining thresholds before they reach the engine.
pub fn validate_parameters(
    min_support: f64,
    min_confidence: f64,
    max_len: usize,
) -> Result<(), MiningError> {
    if !(min_support > 0.0 && min_support <= 1.0) {
        return Err(MiningError::invalid_parameter(
            "min_support",
            format!("{min_support} is not in (0, 1]"),
        ));
    }
    if !(0.0..=1.0).contains(&min_confidence) {
        return Err(MiningError::invalid_parameter(
            "min_confidence",
            format!("{min_confidence} is not in [0, 1]"),
        ));
    }
    if max_len < 1 {
        return Err(MiningError::invalid_parameter("max_len", "must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MinerConfig::default();
        assert_eq!(config.min_support, 0.01);
        assert_eq!(config.min_confidence, 0.2);
        assert_eq!(config.max_len, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = MinerConfig::from_toml("min_support = 0.05\nmax_len = 3\n").unwrap();
        assert_eq!(config.min_support, 0.05);
        assert_eq!(config.max_len, 3);
        assert_eq!(config.min_confidence, 0.2);
        assert_eq!(config.rules_output, PathBuf::from("association_rules.csv"));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = MinerConfig::from_toml("min_support = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn overrides_win() {
        let mut config = MinerConfig::from_toml("min_support = 0.05").unwrap();
        config.apply_overrides(&ConfigOverrides {
            min_support: Some(0.2),
            max_len: Some(2),
            ..Default::default()
        });
        assert_eq!(config.min_support, 0.2);
        assert_eq!(config.max_len, 2);
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        assert!(validate_parameters(0.0, 0.5, 3).is_err());
        assert!(validate_parameters(1.5, 0.5, 3).is_err());
        assert!(validate_parameters(f64::NAN, 0.5, 3).is_err());
        assert!(validate_parameters(0.1, -0.1, 3).is_err());
        assert!(validate_parameters(0.1, 0.5, 0).is_err());
        assert!(validate_parameters(1.0, 0.0, 1).is_ok());
    }

    #[test]
    fn load_validates() {
        let overrides = ConfigOverrides {
            max_len: Some(0),
            ..Default::default()
        };
        let err = MinerConfig::load(None, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
