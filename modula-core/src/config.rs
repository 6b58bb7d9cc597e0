use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_MIN_DOMAIN_SCORE, DEFAULT_MIN_FUNCTIONAL_SCORE, DEFAULT_MIN_SUBCLASS_SCORE,
};
use crate::types::ModulaError;

/// Output format options for module predictions.
///
/// Both formats carry the same JSON document; the compact form is the
/// interface file read by the upload step.
///
/// # Examples
///
/// ```rust
/// use modula_core::config::{ModulaConfig, OutputFormat};
///
/// let config = ModulaConfig {
///     output_format: OutputFormat::JsonPretty,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Single-line JSON array.
    #[default]
    Json,

    /// Indented JSON array, easier to inspect by hand.
    JsonPretty,
}

/// Configuration settings for module calling.
///
/// Controls the confidence thresholds applied to upstream predictions and how
/// genome directories are processed. Every field can be set from a TOML file
/// via [`ModulaConfig::from_toml_file`]; missing keys keep their defaults.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use modula_core::config::ModulaConfig;
///
/// let config = ModulaConfig::default();
/// assert_eq!(config.min_domain_score, 0.5);
/// ```
///
/// ## Stricter domain calls with a fixed worker count
///
/// ```rust
/// use modula_core::config::ModulaConfig;
///
/// let config = ModulaConfig {
///     min_domain_score: 0.8,
///     num_threads: Some(4),
///     quiet: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModulaConfig {
    /// Minimum domain predictor score for a region to be kept.
    ///
    /// T, TE and A domains have context rules that can override this.
    ///
    /// **Default**: `0.5`
    pub min_domain_score: f64,

    /// Minimum homology of an `inactive` k-NN call for KR/DH/ER domains to be
    /// treated as non-functional.
    ///
    /// **Default**: `0.6`
    pub min_functional_score: f64,

    /// Minimum homology of a `B` k-NN call for T domains to receive the B
    /// subclass.
    ///
    /// **Default**: `0.6`
    pub min_subclass_score: f64,

    /// Number of worker threads used across genome directories.
    ///
    /// **Default**: `None` (use all available cores)
    pub num_threads: Option<usize>,

    /// Recompute genomes that already have a module prediction file.
    ///
    /// **Default**: `false` (skip them)
    pub overwrite: bool,

    /// Suppress the end-of-run summary.
    ///
    /// **Default**: `false`
    pub quiet: bool,

    /// Format of `module_predictions.json`.
    ///
    /// **Default**: [`OutputFormat::Json`]
    pub output_format: OutputFormat,
}

impl Default for ModulaConfig {
    fn default() -> Self {
        Self {
            min_domain_score: DEFAULT_MIN_DOMAIN_SCORE,
            min_functional_score: DEFAULT_MIN_FUNCTIONAL_SCORE,
            min_subclass_score: DEFAULT_MIN_SUBCLASS_SCORE,
            num_threads: None,
            overwrite: false,
            quiet: false,
            output_format: OutputFormat::Json,
        }
    }
}

impl ModulaConfig {
    /// Loads a configuration from a TOML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ModulaError::IoError`] if the file cannot be read and
    /// [`ModulaError::ConfigError`] if it does not parse or fails validation.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ModulaError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self, ModulaError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ModulaError::ConfigError(format!("Failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that thresholds are fractions and the worker count is positive.
    pub fn validate(&self) -> Result<(), ModulaError> {
        for (name, value) in [
            ("min_domain_score", self.min_domain_score),
            ("min_functional_score", self.min_functional_score),
            ("min_subclass_score", self.min_subclass_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModulaError::ConfigError(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        if self.num_threads == Some(0) {
            return Err(ModulaError::ConfigError(
                "num_threads must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModulaConfig::default();
        assert_eq!(config.min_domain_score, 0.5);
        assert_eq!(config.min_functional_score, 0.6);
        assert_eq!(config.min_subclass_score, 0.6);
        assert_eq!(config.num_threads, None);
        assert!(!config.overwrite);
        assert!(!config.quiet);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let config = ModulaConfig::from_toml_str(
            "min_domain_score = 0.7\nnum_threads = 2\noutput_format = \"json_pretty\"\n",
        )
        .unwrap();
        assert_eq!(config.min_domain_score, 0.7);
        assert_eq!(config.num_threads, Some(2));
        assert_eq!(config.output_format, OutputFormat::JsonPretty);
        assert_eq!(config.min_functional_score, 0.6);
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        let result = ModulaConfig::from_toml_str("min_score = 0.7\n");
        assert!(matches!(result, Err(ModulaError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_scores() {
        let config = ModulaConfig {
            min_subclass_score: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_subclass_score"));
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = ModulaConfig {
            num_threads: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = ModulaConfig::from_toml_file("does/not/exist.toml");
        assert!(matches!(result, Err(ModulaError::IoError(_))));
    }
}
