//! Narrative configuration.
//!
//! Controls the text the annotator falls back to and how final
//! interpretations are joined. Validation collects every problem rather than
//! stopping at the first, so a config screen can show them all at once.
//!
//! ```
//! use hexpath_logic::config::{validate_config, NarrativeConfig};
//!
//! let config = NarrativeConfig::default();
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables for annotation and scenario output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Theme used when the corpus has no entry for a line.
    pub fallback_theme: String,
    /// Joiner between phase keywords in the final interpretation.
    pub phase_separator: String,
    /// Attach glossary entries for the operations a path uses.
    pub include_glossary: bool,
    /// Bound on cached initial states in `CachedScenarioSet`.
    pub cache_capacity: usize,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            fallback_theme: "状況の展開".to_string(),
            phase_separator: "→".to_string(),
            include_glossary: true,
            cache_capacity: 384,
        }
    }
}

impl NarrativeConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("fallback theme must not be empty")]
    EmptyFallbackTheme,
    #[error("phase separator must not be empty")]
    EmptyPhaseSeparator,
    #[error("cache capacity must be at least 1")]
    ZeroCacheCapacity,
}

/// Validate a narrative configuration, returning all errors found.
pub fn validate_config(config: &NarrativeConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.fallback_theme.trim().is_empty() {
        errors.push(ConfigError::EmptyFallbackTheme);
    }
    if config.phase_separator.is_empty() {
        errors.push(ConfigError::EmptyPhaseSeparator);
    }
    if config.cache_capacity == 0 {
        errors.push(ConfigError::ZeroCacheCapacity);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&NarrativeConfig::default()).is_empty());
    }

    #[test]
    fn test_blank_fallback_theme() {
        let config = NarrativeConfig {
            fallback_theme: "   ".into(),
            ..Default::default()
        };
        assert_eq!(
            validate_config(&config),
            vec![ConfigError::EmptyFallbackTheme]
        );
    }

    #[test]
    fn test_collects_every_error() {
        let config = NarrativeConfig {
            fallback_theme: String::new(),
            phase_separator: String::new(),
            include_glossary: false,
            cache_capacity: 0,
        };
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigError::EmptyPhaseSeparator));
        assert!(errors.contains(&ConfigError::ZeroCacheCapacity));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = NarrativeConfig::from_json(r#"{"phase_separator": " / "}"#).unwrap();
        assert_eq!(config.phase_separator, " / ");
        assert_eq!(config.fallback_theme, NarrativeConfig::default().fallback_theme);
        assert!(config.include_glossary);
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        assert!(NarrativeConfig::from_json(r#"{"cache_capacity": "many"}"#).is_err());
    }
}
