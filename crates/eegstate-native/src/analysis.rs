//! Whole-recording analysis
//!
//! Runs the full pipeline on one recording: preprocess, estimate band
//! powers, classify, and derive band ratios.

use eegstate_core::{BandPowers, BandRatios, ClassificationResult, StateClassifier};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::processing::{preprocess, recording_spectrum, Spectrum};
use crate::recording::Recording;

/// Result of analysing a whole recording
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordingAnalysis {
    /// Channel-averaged spectrum of the preprocessed data
    pub spectrum: Spectrum,
    /// Band powers taken from the spectrum
    pub band_powers: BandPowers,
    /// Classification of the band powers
    pub classification: ClassificationResult,
    /// Inter-band ratios
    pub ratios: BandRatios,
}

/// Analyse a recording end to end.
///
/// # Errors
///
/// Returns an error if the configuration does not fit the recording (filter
/// cutoffs above Nyquist) or the classifier rejects the estimated powers.
pub fn analyze_recording(
    recording: &Recording,
    config: &AnalysisConfig,
) -> AnalysisResult<RecordingAnalysis> {
    let classifier = StateClassifier::new(config.classifier)?;
    let filtered = preprocess(recording, &config.filter)?;

    let spectrum = recording_spectrum(&filtered, &config.spectral)?;
    let band_powers = spectrum.band_powers();
    let classification = classifier.classify(band_powers)?;

    info!(
        "Analysed {} channels, {:.1}s: dominant {} -> {}",
        recording.n_channels(),
        recording.duration_secs(),
        classification.dominant,
        classification.state
    );

    Ok(RecordingAnalysis { spectrum, band_powers, classification, ratios: band_powers.ratios() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{generate, SyntheticConfig};
    use eegstate_core::{AttentionState, EegBand};

    fn synthetic(dominant: EegBand, seed: u64) -> Recording {
        generate(&SyntheticConfig {
            n_channels: 8,
            duration_secs: 20.0,
            dominant,
            seed,
            ..SyntheticConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_alpha_recording_is_calm() {
        let analysis = analyze_recording(&synthetic(EegBand::Alpha, 7), &AnalysisConfig::default())
            .unwrap();
        assert_eq!(analysis.classification.dominant, EegBand::Alpha);
        assert_eq!(analysis.classification.state, AttentionState::Calm);
        assert_eq!(analysis.band_powers, analysis.classification.powers);
    }

    #[test]
    fn test_beta_recording_is_focused() {
        let analysis = analyze_recording(&synthetic(EegBand::Beta, 11), &AnalysisConfig::default())
            .unwrap();
        assert_eq!(analysis.classification.state, AttentionState::Focused);
        assert!(analysis.ratios.alpha_beta.unwrap() < 1.0);
    }

    #[test]
    fn test_delta_recording_is_sleepy() {
        let analysis = analyze_recording(&synthetic(EegBand::Delta, 3), &AnalysisConfig::default())
            .unwrap();
        assert_eq!(analysis.classification.state, AttentionState::Sleepy);
    }

    #[test]
    fn test_analysis_rejects_filter_above_nyquist() {
        let recording = generate(&SyntheticConfig {
            n_channels: 2,
            sample_rate: 64.0,
            duration_secs: 8.0,
            ..SyntheticConfig::default()
        })
        .unwrap();
        assert!(analyze_recording(&recording, &AnalysisConfig::default()).is_err());
    }
}
