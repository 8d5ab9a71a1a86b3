//! Chunked replay of a recording
//!
//! Steps through a recording one chunk at a time and classifies the
//! trailing analysis window at each step, the way a live monitor would.
//!
//! ```text
//!                 position   position + chunk
//!                     │           │
//! ────────────────────┼───────────┼──────────────
//!       ├──────── window ─────────┤   analysed
//!                     ├── chunk ──┤   displayed
//! ```
//!
//! The window is longer than the chunk so spectral estimates keep a useful
//! frequency resolution while updates stay frequent.

use eegstate_core::{BandPowers, BandRatios, ClassificationResult, StateClassifier};
use tracing::{debug, info};

use crate::config::{AnalysisConfig, SpectralConfig};
use crate::error::{AnalysisError, AnalysisResult};
use crate::processing::{estimate_band_powers, preprocess};
use crate::recording::Recording;

/// Analysis of one replay step
#[derive(Clone, Debug)]
pub struct ChunkAnalysis {
    /// Start of the analysed window (seconds)
    pub start_secs: f64,
    /// End of the analysed window (seconds, exclusive)
    pub end_secs: f64,
    /// Band powers of the window
    pub band_powers: BandPowers,
    /// Classification of the window
    pub classification: ClassificationResult,
    /// Inter-band ratios
    pub ratios: BandRatios,
    /// Most recent chunk of preprocessed data, for display
    pub display: Recording,
}

/// Windowed analyzer over a preprocessed recording
#[derive(Clone, Debug)]
pub struct ChunkedAnalyzer {
    data: Recording,
    classifier: StateClassifier,
    spectral: SpectralConfig,
    chunk_samples: usize,
    window_samples: usize,
    position: usize,
}

impl ChunkedAnalyzer {
    /// Preprocess `recording` and position the analyzer at its start.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the filter does
    /// not fit the sample rate, or a chunk would be shorter than a sample.
    pub fn new(recording: &Recording, config: &AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;

        let classifier = StateClassifier::new(config.classifier)?;
        let data = preprocess(recording, &config.filter)?;
        let fs = data.sample_rate();

        let chunk_samples = (config.streaming.chunk_secs * fs) as usize;
        let window_samples = (config.streaming.window_secs * fs) as usize;
        if chunk_samples == 0 {
            return Err(AnalysisError::InvalidConfig {
                parameter: "streaming.chunk_secs",
                reason: format!("shorter than one sample at {fs} Hz"),
            });
        }

        info!(
            "Initialized chunked analyzer: {fs} Hz, {:.1}s total, {}s chunks, {}s window",
            data.duration_secs(),
            config.streaming.chunk_secs,
            config.streaming.window_secs
        );

        Ok(Self {
            data,
            classifier,
            spectral: config.spectral,
            chunk_samples,
            window_samples,
            position: 0,
        })
    }

    /// Analyse the next window and advance by one chunk.
    ///
    /// Returns `Ok(None)` once fewer than a full window of samples remain
    /// ahead of the current position.
    ///
    /// # Errors
    ///
    /// Returns an error if spectral estimation or classification fails.
    pub fn next_chunk(&mut self) -> AnalysisResult<Option<ChunkAnalysis>> {
        let total = self.data.n_samples();
        if self.position + self.window_samples >= total {
            return Ok(None);
        }

        let end = (self.position + self.chunk_samples).min(total);
        let start = (self.position + self.chunk_samples).saturating_sub(self.window_samples);

        let window = self.data.slice(start, end)?;
        let band_powers = estimate_band_powers(&window, &self.spectral)?;
        let classification = self.classifier.classify(band_powers)?;

        let display = self.data.slice(end.saturating_sub(self.chunk_samples), end)?;

        self.position += self.chunk_samples;

        let fs = self.data.sample_rate();
        debug!(
            "Chunk {:.1}-{:.1}s: {} -> {}",
            start as f64 / fs,
            end as f64 / fs,
            classification.dominant,
            classification.state
        );

        Ok(Some(ChunkAnalysis {
            start_secs: start as f64 / fs,
            end_secs: end as f64 / fs,
            band_powers,
            classification,
            ratios: band_powers.ratios(),
            display,
        }))
    }

    /// Fraction of the recording consumed, in [0, 1]
    pub fn progress(&self) -> f64 {
        (self.position as f64 / self.data.n_samples() as f64).min(1.0)
    }

    /// Rewind to the start
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Jump to a time in seconds, clamped to the recording
    pub fn seek(&mut self, secs: f64) {
        let target = (secs * self.data.sample_rate()) as usize;
        self.position = target.min(self.data.n_samples());
    }

    /// Current position in seconds
    pub fn current_time(&self) -> f64 {
        self.position as f64 / self.data.sample_rate()
    }

    /// Time of the last sample in seconds
    pub fn total_duration(&self) -> f64 {
        self.data.duration_secs()
    }
}

impl Iterator for ChunkedAnalyzer {
    type Item = AnalysisResult<ChunkAnalysis>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{generate, SyntheticConfig};
    use eegstate_core::{AttentionState, EegBand};

    fn recording(duration_secs: f64, dominant: EegBand) -> Recording {
        generate(&SyntheticConfig {
            n_channels: 4,
            sample_rate: 128.0,
            duration_secs,
            dominant,
            seed: 42,
            ..SyntheticConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_chunk_count_and_windows() {
        // 30 s at 128 Hz, 3 s chunks, 10 s window
        let mut analyzer =
            ChunkedAnalyzer::new(&recording(30.0, EegBand::Alpha), &AnalysisConfig::default())
                .unwrap();

        let chunks: Vec<_> = analyzer.by_ref().collect::<AnalysisResult<_>>().unwrap();

        // Positions 0, 3, ..., 18 s qualify (pos + 10 s < 30 s)
        assert_eq!(chunks.len(), 7);

        assert!((chunks[0].start_secs - 0.0).abs() < 1e-9);
        assert!((chunks[0].end_secs - 3.0).abs() < 1e-9);
        assert!((chunks[6].start_secs - 11.0).abs() < 1e-9);
        assert!((chunks[6].end_secs - 21.0).abs() < 1e-9);

        for chunk in &chunks {
            assert_eq!(chunk.display.n_samples(), 3 * 128);
            assert_eq!(chunk.display.n_channels(), 4);
        }

        assert!(analyzer.next_chunk().unwrap().is_none());
    }

    #[test]
    fn test_chunks_classify_dominant_band() {
        let analyzer =
            ChunkedAnalyzer::new(&recording(30.0, EegBand::Alpha), &AnalysisConfig::default())
                .unwrap();

        // Skip the first, shortest windows
        for chunk in analyzer.skip(3) {
            let chunk = chunk.unwrap();
            assert_eq!(chunk.classification.state, AttentionState::Calm);
        }
    }

    #[test]
    fn test_progress_seek_and_reset() {
        let mut analyzer =
            ChunkedAnalyzer::new(&recording(30.0, EegBand::Beta), &AnalysisConfig::default())
                .unwrap();

        assert!(analyzer.progress().abs() < 1e-12);
        analyzer.next_chunk().unwrap();
        assert!((analyzer.current_time() - 3.0).abs() < 1e-9);
        assert!((analyzer.progress() - 0.1).abs() < 1e-9);

        analyzer.seek(15.5);
        assert!((analyzer.current_time() - 15.5).abs() < 1e-9);

        analyzer.seek(1000.0);
        assert!((analyzer.progress() - 1.0).abs() < 1e-12);
        assert!(analyzer.next_chunk().unwrap().is_none());

        analyzer.seek(-5.0);
        assert!(analyzer.current_time().abs() < 1e-12);

        analyzer.seek(12.0);
        analyzer.reset();
        assert!(analyzer.current_time().abs() < 1e-12);
        assert!((analyzer.total_duration() - (30.0 * 128.0 - 1.0) / 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_recording_shorter_than_window_yields_nothing() {
        let mut analyzer =
            ChunkedAnalyzer::new(&recording(8.0, EegBand::Theta), &AnalysisConfig::default())
                .unwrap();
        assert!(analyzer.next_chunk().unwrap().is_none());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.streaming.chunk_secs = 0.0;
        assert!(ChunkedAnalyzer::new(&recording(30.0, EegBand::Alpha), &config).is_err());
    }
}
