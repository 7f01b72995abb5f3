//! Configuration management for the coupling cluster analyzer

use crate::error::{AnalyzerError, AnalyzerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration for the coupling cluster analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Average coupling a pair of clusters must exceed to merge in the
    /// threshold phase
    pub threshold: f64,

    /// Class name prefixes treated as library classes and dropped from the
    /// event stream
    pub excluded_prefixes: Vec<String>,

    /// Number of central classes reported per cluster
    pub central_class_count: usize,

    /// Number of strongest class pairs included in the summary
    pub top_pairs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            excluded_prefixes: vec!["java.".into(), "javax.".into(), "org.".into()],
            central_class_count: 5,
            top_pairs: 10,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        threshold: f64,
        excluded_prefixes: Vec<String>,
        central_class_count: usize,
        top_pairs: usize,
    ) -> Self {
        Self {
            threshold,
            excluded_prefixes,
            central_class_count,
            top_pairs,
        }
    }

    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> AnalyzerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnalyzerError::FileNotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;

        log::debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Any finite threshold is accepted; NaN and infinities are not
    pub fn validate(&self) -> AnalyzerResult<()> {
        if !self.threshold.is_finite() {
            return Err(AnalyzerError::InvalidConfig(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
