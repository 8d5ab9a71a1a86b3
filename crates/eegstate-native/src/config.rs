//! Analysis configuration
//!
//! One [`AnalysisConfig`] carries every tunable of the pipeline: the
//! preprocessing band, the spectral analysis window, the classifier tie
//! tolerance and the streaming chunk/window sizes. It loads from TOML, and
//! any section left out falls back to its defaults.
//!
//! ```toml
//! [filter]
//! low_hz = 1.0
//! high_hz = 40.0
//!
//! [spectral]
//! window_secs = 2.0
//!
//! [classifier]
//! epsilon = 0.01
//! ```

use std::path::Path;

use eegstate_core::ClassifierConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Preprocessing filter settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// High-pass cutoff (Hz)
    pub low_hz: f64,
    /// Low-pass cutoff (Hz)
    pub high_hz: f64,
    /// Re-reference every channel to the across-channel mean
    pub average_reference: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { low_hz: 1.0, high_hz: 50.0, average_reference: true }
    }
}

/// Welch spectral estimation settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// Segment length in seconds (clipped to the available data)
    pub window_secs: f64,
    /// Fraction of each segment shared with the next, in [0, 1)
    pub overlap: f64,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self { window_secs: 4.0, overlap: 0.5 }
    }
}

/// Chunked replay settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Step between successive classifications (seconds)
    pub chunk_secs: f64,
    /// Length of data analysed per classification (seconds)
    pub window_secs: f64,
    /// Number of classifications kept in session history
    pub history_len: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { chunk_secs: 3.0, window_secs: 10.0, history_len: 50 }
    }
}

/// Complete pipeline configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Preprocessing
    pub filter: FilterConfig,
    /// Spectral estimation
    pub spectral: SpectralConfig,
    /// Classification
    pub classifier: ClassifierConfig,
    /// Chunked replay
    pub streaming: StreamingConfig,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or a value is out of
    /// range.
    pub fn from_toml_str(content: &str) -> AnalysisResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or a
    /// value is out of range.
    pub fn from_file(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| AnalysisError::Io { path: path.to_path_buf(), source })?;

        tracing::debug!("Loaded analysis config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Validate configuration values.
    ///
    /// Filter cutoffs are checked against the sample rate later, when a
    /// recording is preprocessed.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> AnalysisResult<()> {
        let FilterConfig { low_hz, high_hz, .. } = self.filter;
        if !(low_hz.is_finite() && low_hz > 0.0) {
            return Err(invalid("filter.low_hz", format!("must be > 0, got {low_hz}")));
        }
        if !(high_hz.is_finite() && high_hz > low_hz) {
            return Err(invalid(
                "filter.high_hz",
                format!("must exceed low_hz ({low_hz}), got {high_hz}"),
            ));
        }

        let SpectralConfig { window_secs, overlap } = self.spectral;
        if !(window_secs.is_finite() && window_secs > 0.0) {
            return Err(invalid("spectral.window_secs", format!("must be > 0, got {window_secs}")));
        }
        if !(0.0..1.0).contains(&overlap) {
            return Err(invalid("spectral.overlap", format!("must be in [0, 1), got {overlap}")));
        }

        self.classifier.validate()?;

        let StreamingConfig { chunk_secs, window_secs, history_len } = self.streaming;
        if !(chunk_secs.is_finite() && chunk_secs > 0.0) {
            return Err(invalid("streaming.chunk_secs", format!("must be > 0, got {chunk_secs}")));
        }
        if !(window_secs.is_finite() && window_secs >= chunk_secs) {
            return Err(invalid(
                "streaming.window_secs",
                format!("must be >= chunk_secs ({chunk_secs}), got {window_secs}"),
            ));
        }
        if history_len == 0 {
            return Err(invalid("streaming.history_len", "must be > 0".to_string()));
        }

        Ok(())
    }
}

fn invalid(parameter: &'static str, reason: String) -> AnalysisError {
    AnalysisError::InvalidConfig { parameter, reason }
}
