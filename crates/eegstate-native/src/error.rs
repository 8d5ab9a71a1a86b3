//! Error Types for Native Processing
//!
//! Error types for preprocessing, spectral estimation, recording discovery
//! and configuration using `thiserror`.

use std::path::PathBuf;

use eegstate_core::ClassifyError;
use thiserror::Error;

/// Analysis error types
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Not enough samples for the requested operation
    #[error("Insufficient data: got {got} samples, need {need}")]
    InsufficientData {
        /// Number of samples available
        got: usize,
        /// Number of samples needed
        need: usize,
    },

    /// Filter cutoffs do not fit the sample rate
    #[error("Invalid filter config: {low_hz}-{high_hz} Hz at {sample_rate} Hz sample rate ({reason})")]
    InvalidFilterConfig {
        /// High-pass cutoff
        low_hz: f64,
        /// Low-pass cutoff
        high_hz: f64,
        /// Recording sample rate
        sample_rate: f64,
        /// Reason
        reason: &'static str,
    },

    /// A configuration parameter is out of range
    #[error("Invalid config parameter {parameter}: {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: &'static str,
        /// Reason
        reason: String,
    },

    /// Channels of a recording differ in length
    #[error("Channel {channel} has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Offending channel index
        channel: usize,
        /// Its length
        got: usize,
        /// Length of the first channel
        expected: usize,
    },

    /// Recording has no channels or no samples
    #[error("Recording is empty")]
    EmptyRecording,

    /// Selected recording is not offered by the source
    #[error("Unknown recording: {0}")]
    UnknownRecording(String),

    /// Filesystem error while scanning for recordings or reading config
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Band powers rejected by the classifier
    #[error("Classification failed: {0}")]
    Classification(#[from] ClassifyError),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
