//! Extractor configuration
//!
//! Loaded from YAML or JSON, or built in code. Every constructor validates,
//! so a bad damping factor or window is reported before any text is ranked.

use crate::error::{TermRankResult, ValidationError};
use crate::graph::DEFAULT_WINDOW;
use crate::ranking::{RankingConfig, DEFAULT_CONVERGENCE, DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS};
use crate::stopwords::StopwordStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a [`KeywordExtractor`](crate::KeywordExtractor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Damping factor, `0 < d <= 1`
    pub damping: f64,
    /// Convergence threshold, `<= 1`
    pub convergence: f64,
    /// Cap on ranking sweeps
    pub max_iterations: usize,
    /// Co-occurrence window radius
    pub window: usize,
    /// Language used when `add_text` is called without one
    pub language: Option<String>,
    /// Directory holding `<lang>.txt` stopword lists
    pub stopwords_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            convergence: DEFAULT_CONVERGENCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            window: DEFAULT_WINDOW,
            language: None,
            stopwords_dir: None,
        }
    }
}

impl ExtractorConfig {
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_convergence(mut self, convergence: f64) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_stopwords_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stopwords_dir = Some(dir.into());
        self
    }

    /// Check every parameter against its contract.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ranking()?;
        if self.window == 0 {
            return Err(ValidationError::InvalidWindow(self.window));
        }
        Ok(())
    }

    /// The ranking subset, validated.
    pub fn ranking(&self) -> Result<RankingConfig, ValidationError> {
        RankingConfig::new(self.damping, self.convergence)?.with_max_iterations(self.max_iterations)
    }

    /// Configured stopword directory, or the per-user default.
    pub fn stopwords_dir(&self) -> PathBuf {
        self.stopwords_dir
            .clone()
            .unwrap_or_else(StopwordStore::default_dir)
    }

    pub fn from_yaml_str(yaml: &str) -> TermRankResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> TermRankResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> TermRankResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TermRankError;

    #[test]
    fn defaults_are_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window, 3);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config = ExtractorConfig::from_yaml_str("damping: 0.7\nlanguage: es\n").unwrap();
        assert_eq!(config.damping, 0.7);
        assert_eq!(config.convergence, 0.001);
        assert_eq!(config.language.as_deref(), Some("es"));
    }

    #[test]
    fn json_config_parses() {
        let config =
            ExtractorConfig::from_json_str(r#"{"window": 5, "stopwords_dir": "/tmp/sw"}"#).unwrap();
        assert_eq!(config.window, 5);
        assert_eq!(config.stopwords_dir(), PathBuf::from("/tmp/sw"));
    }

    #[test]
    fn invalid_damping_fails_on_load() {
        for yaml in ["damping: 0.0", "damping: 1.5"] {
            let err = ExtractorConfig::from_yaml_str(yaml).unwrap_err();
            assert!(
                matches!(err, TermRankError::Validation(ValidationError::InvalidDamping(_))),
                "{yaml}: {err}"
            );
        }
    }

    #[test]
    fn invalid_convergence_fails_on_load() {
        let err = ExtractorConfig::from_yaml_str("convergence: 2.0").unwrap_err();
        assert!(matches!(
            err,
            TermRankError::Validation(ValidationError::InvalidConvergence(_))
        ));
    }

    #[test]
    fn zero_window_is_invalid() {
        let config = ExtractorConfig::default().with_window(0);
        assert_eq!(config.validate(), Err(ValidationError::InvalidWindow(0)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ExtractorConfig::from_yaml_str("dampng: 0.5").unwrap_err();
        assert!(matches!(err, TermRankError::Yaml(_)));
    }

    #[test]
    fn from_path_picks_parser_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let json = dir.path().join("termrank.json");
        std::fs::write(&json, r#"{"damping": 0.9}"#).unwrap();
        let yaml = dir.path().join("termrank.yaml");
        std::fs::write(&yaml, "damping: 0.6\n").unwrap();

        assert_eq!(ExtractorConfig::from_path(&json).unwrap().damping, 0.9);
        assert_eq!(ExtractorConfig::from_path(&yaml).unwrap().damping, 0.6);
        assert!(matches!(
            ExtractorConfig::from_path(dir.path().join("missing.yaml")),
            Err(TermRankError::Io(_))
        ));
    }
}
