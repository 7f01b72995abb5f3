//! Core library functions for the coupling cluster analyzer

pub mod cluster;
pub mod config;
pub mod coupling;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod storage;
pub mod viz;

pub use anyhow::{anyhow, Result};
pub use error::{AnalyzerError, AnalyzerResult};
