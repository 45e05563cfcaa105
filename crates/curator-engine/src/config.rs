//! Configuration for the analysis engine
//!
//! Thresholds and multipliers used by relevance scoring and conflict filtering.

use crate::EngineError;
use serde::{Deserialize, Serialize};

/// Tunable constants of an analysis pass
///
/// # Examples
///
/// ```
/// use curator_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.significance_threshold, 0.3);
/// assert_eq!(config.decay_window_days, 365.0);
///
/// let strict = EngineConfig::strict();
/// assert!(strict.significance_threshold < config.significance_threshold);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Conflicts scoring at or below this value are discarded as noise
    /// Default: 0.3
    pub significance_threshold: f64,

    /// Age (in days) at which base relevance reaches zero
    /// Default: 365
    pub decay_window_days: f64,

    /// Multiplier applied once when any deprecated feature is mentioned
    /// Default: 0.3
    pub deprecated_penalty: f64,

    /// Major version at or above which relevance is boosted
    /// Default: 3
    #[serde(default = "default_modern_major")]
    pub modern_major_version: u64,

    /// Multiplier for modern major versions
    /// Default: 1.2
    #[serde(default = "default_modern_boost")]
    pub modern_version_boost: f64,

    /// Major version at or below which relevance is reduced
    /// Default: 1
    #[serde(default = "default_legacy_major")]
    pub legacy_major_version: u64,

    /// Multiplier for legacy major versions
    /// Default: 0.8
    #[serde(default = "default_legacy_penalty")]
    pub legacy_version_penalty: f64,
}

fn default_modern_major() -> u64 {
    3
}

fn default_modern_boost() -> f64 {
    1.2
}

fn default_legacy_major() -> u64 {
    1
}

fn default_legacy_penalty() -> f64 {
    0.8
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            significance_threshold: 0.3,
            decay_window_days: 365.0,
            deprecated_penalty: 0.3,
            modern_major_version: default_modern_major(),
            modern_version_boost: default_modern_boost(),
            legacy_major_version: default_legacy_major(),
            legacy_version_penalty: default_legacy_penalty(),
        }
    }
}

impl EngineConfig {
    /// Strict preset: reports weaker conflicts and ages content twice as fast
    pub fn strict() -> Self {
        Self {
            significance_threshold: 0.2,
            decay_window_days: 180.0,
            deprecated_penalty: 0.2,
            ..Self::default()
        }
    }

    /// Lenient preset: only strong conflicts, two-year decay window
    pub fn lenient() -> Self {
        Self {
            significance_threshold: 0.5,
            decay_window_days: 730.0,
            deprecated_penalty: 0.5,
            ..Self::default()
        }
    }

    /// Multiplier contributed by an article's major version
    pub fn version_multiplier(&self, major: u64) -> f64 {
        if major >= self.modern_major_version {
            self.modern_version_boost
        } else if major <= self.legacy_major_version {
            self.legacy_version_penalty
        } else {
            1.0
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..1.0).contains(&self.significance_threshold) {
            return Err(EngineError::Configuration(
                "significance_threshold must be in [0.0, 1.0)".to_string(),
            ));
        }
        if !self.decay_window_days.is_finite() || self.decay_window_days <= 0.0 {
            return Err(EngineError::Configuration(
                "decay_window_days must be finite and greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.deprecated_penalty) {
            return Err(EngineError::Configuration(
                "deprecated_penalty must be in [0.0, 1.0]".to_string(),
            ));
        }
        for (name, value) in [
            ("modern_version_boost", self.modern_version_boost),
            ("legacy_version_penalty", self.legacy_version_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::Configuration(format!(
                    "{} must be finite and non-negative",
                    name
                )));
            }
        }
        if self.legacy_major_version >= self.modern_major_version {
            return Err(EngineError::Configuration(
                "legacy_major_version must be below modern_major_version".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| EngineError::Configuration(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Configuration(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::strict().validate().is_ok());
        assert!(EngineConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_version_multiplier() {
        let config = EngineConfig::default();
        assert_eq!(config.version_multiplier(0), 0.8);
        assert_eq!(config.version_multiplier(1), 0.8);
        assert_eq!(config.version_multiplier(2), 1.0);
        assert_eq!(config.version_multiplier(3), 1.2);
        assert_eq!(config.version_multiplier(12), 1.2);
    }

    #[test]
    fn test_invalid_threshold() {
        let config = EngineConfig {
            significance_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_invalid_decay_window() {
        let config = EngineConfig {
            decay_window_days: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_decay_window_rejected() {
        for days in [f64::INFINITY, f64::NAN] {
            let config = EngineConfig {
                decay_window_days: days,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
        }
    }

    #[test]
    fn test_non_finite_version_multipliers_rejected() {
        for value in [f64::INFINITY, f64::NAN, -0.5] {
            let modern = EngineConfig {
                modern_version_boost: value,
                ..Default::default()
            };
            assert!(
                matches!(modern.validate(), Err(EngineError::Configuration(ref msg)) if msg.contains("modern_version_boost"))
            );

            let legacy = EngineConfig {
                legacy_version_penalty: value,
                ..Default::default()
            };
            assert!(
                matches!(legacy.validate(), Err(EngineError::Configuration(ref msg)) if msg.contains("legacy_version_penalty"))
            );
        }
    }

    #[test]
    fn test_toml_rejects_infinite_boost() {
        let toml_str = r#"
            significance_threshold = 0.3
            decay_window_days = 365.0
            deprecated_penalty = 0.3
            modern_version_boost = inf
        "#;
        assert!(matches!(
            EngineConfig::from_toml(toml_str),
            Err(EngineError::Configuration(_))
        ));

        let toml_str = r#"
            significance_threshold = 0.3
            decay_window_days = inf
            deprecated_penalty = 0.3
        "#;
        assert!(EngineConfig::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = EngineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_version_fields_default() {
        let toml_str = r#"
            significance_threshold = 0.3
            decay_window_days = 365.0
            deprecated_penalty = 0.3
        "#;
        let parsed = EngineConfig::from_toml(toml_str).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }
}
