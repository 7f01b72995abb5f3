//! Error types for loading analysis inputs and writing results

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the boundaries of the analyzer (files, formats, config).
///
/// Aggregation and clustering never fail; everything here comes from
/// reading event streams, configuration files or writing results.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("malformed invocation event on line {line}: {content:?}")]
    MalformedEvent { line: usize, content: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] polars::prelude::PolarsError),
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_event_message_names_line() {
        let err = AnalyzerError::MalformedEvent {
            line: 7,
            content: "Foo Bar".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed invocation event on line 7: \"Foo Bar\""
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AnalyzerError = io.into();
        assert!(matches!(err, AnalyzerError::Io(_)));
    }
}
