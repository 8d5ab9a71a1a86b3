//! Attention-state classification
//!
//! Maps one window's band powers to an [`AttentionState`] through the band
//! that carries the most power.
//!
//! # Tie-break
//!
//! Every band within `epsilon` of the maximum is a candidate, and the
//! candidate earliest in [`EegBand::ALL`] wins (Delta > Theta > Alpha >
//! Beta > Gamma). With the default `epsilon = 0` only exact ties are
//! merged, so an all-zero window classifies as Delta / Sleepy.
//!
//! # Example
//!
//! ```rust
//! use eegstate_core::classifier::classify_with_epsilon;
//! use eegstate_core::types::{AttentionState, BandPowers, EegBand};
//!
//! let powers = BandPowers::new(0.0, 0.0, 4.995, 5.0, 0.0);
//! let result = classify_with_epsilon(powers, 0.01).unwrap();
//! assert_eq!(result.dominant, EegBand::Alpha);
//! assert_eq!(result.state, AttentionState::Calm);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;
use crate::types::{AttentionState, BandPowers, ClassificationResult, EegBand};

/// Classifier parameters
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Bands within this distance of the maximum count as tied
    #[serde(default)]
    pub epsilon: f64,
}

impl ClassifierConfig {
    /// Create a config with a tie tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidInput`] if `epsilon` is negative or
    /// not finite.
    pub fn with_epsilon(epsilon: f64) -> Result<Self, ClassifyError> {
        let config = Self { epsilon };
        config.validate()?;
        Ok(config)
    }

    /// Check the tie tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidInput`] if `epsilon` is negative or
    /// not finite.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        check_epsilon(self.epsilon)
    }
}

/// Stateless band-power classifier with a fixed tie tolerance
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateClassifier {
    config: ClassifierConfig,
}

impl StateClassifier {
    /// Create a classifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidInput`] if the config's epsilon is
    /// invalid.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifyError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Tie tolerance in use
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Classify one window of band powers.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidInput`] if any power is negative,
    /// NaN or infinite.
    pub fn classify(&self, powers: BandPowers) -> Result<ClassificationResult, ClassifyError> {
        powers.validate()?;

        let dominant = pick_dominant(&powers, self.config.epsilon);

        Ok(ClassificationResult {
            powers,
            dominant,
            state: AttentionState::from_band(dominant),
        })
    }
}

/// Classify with exact-tie semantics (`epsilon = 0`).
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidInput`] if any power is negative, NaN or
/// infinite.
pub fn classify(powers: BandPowers) -> Result<ClassificationResult, ClassifyError> {
    StateClassifier::default().classify(powers)
}

/// Classify with a tie tolerance.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidInput`] if any power or `epsilon` is
/// negative, NaN or infinite.
pub fn classify_with_epsilon(
    powers: BandPowers,
    epsilon: f64,
) -> Result<ClassificationResult, ClassifyError> {
    StateClassifier::new(ClassifierConfig::with_epsilon(epsilon)?)?.classify(powers)
}

/// Dominant band after tie-breaking.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidInput`] if any power or `epsilon` is
/// negative, NaN or infinite.
pub fn dominant_band(powers: &BandPowers, epsilon: f64) -> Result<EegBand, ClassifyError> {
    check_epsilon(epsilon)?;
    powers.validate()?;
    Ok(pick_dominant(powers, epsilon))
}

// Inputs are already validated; `max >= value` so the gap is never negative.
fn pick_dominant(powers: &BandPowers, epsilon: f64) -> EegBand {
    let max = powers
        .iter()
        .fold(0.0_f64, |acc, (_, value)| if value > acc { value } else { acc });

    powers
        .iter()
        .find(|&(_, value)| max - value <= epsilon)
        .map_or(EegBand::Delta, |(band, _)| band)
}

fn check_epsilon(epsilon: f64) -> Result<(), ClassifyError> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(())
    } else {
        Err(ClassifyError::InvalidInput { field: "epsilon", value: epsilon })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn powers(delta: f64, theta: f64, alpha: f64, beta: f64, gamma: f64) -> BandPowers {
        BandPowers::new(delta, theta, alpha, beta, gamma)
    }

    #[test]
    fn test_each_band_maps_to_its_state() {
        let cases = [
            (powers(9.0, 1.0, 1.0, 1.0, 1.0), EegBand::Delta, AttentionState::Sleepy),
            (powers(1.0, 9.0, 1.0, 1.0, 1.0), EegBand::Theta, AttentionState::Relaxed),
            (powers(1.0, 1.0, 9.0, 1.0, 1.0), EegBand::Alpha, AttentionState::Calm),
            (powers(1.0, 1.0, 1.0, 9.0, 1.0), EegBand::Beta, AttentionState::Focused),
            (powers(1.0, 1.0, 1.0, 1.0, 9.0), EegBand::Gamma, AttentionState::HighlyEngaged),
        ];

        for (input, band, state) in cases {
            let result = classify(input).unwrap();
            assert_eq!(result.dominant, band);
            assert_eq!(result.state, state);
            assert_eq!(result.state, AttentionState::from_band(result.dominant));
            assert_eq!(result.powers, input);
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let input = powers(0.3, 2.5, 2.4, 1.1, 0.2);
        assert_eq!(classify(input).unwrap(), classify(input).unwrap());
    }

    #[test]
    fn test_exact_tie_prefers_earlier_band() {
        let result = classify(powers(1.0, 1.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(result.dominant, EegBand::Delta);
        assert_eq!(result.state, AttentionState::Sleepy);

        let result = classify(powers(0.0, 0.0, 0.0, 2.0, 2.0)).unwrap();
        assert_eq!(result.dominant, EegBand::Beta);
    }

    #[test]
    fn test_all_zero_defaults_to_sleepy() {
        let result = classify(BandPowers::default()).unwrap();
        assert_eq!(result.dominant, EegBand::Delta);
        assert_eq!(result.state, AttentionState::Sleepy);
    }

    #[test]
    fn test_negative_power_rejected() {
        let err = classify(powers(-1.0, 0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, ClassifyError::InvalidInput { field: "Delta", value: -1.0 });
    }

    #[test]
    fn test_nan_and_infinite_rejected() {
        assert!(classify(powers(0.0, 0.0, f64::NAN, 0.0, 0.0)).is_err());
        assert!(classify(powers(0.0, 0.0, 0.0, f64::INFINITY, 0.0)).is_err());
        assert!(classify(powers(0.0, 0.0, 0.0, 0.0, f64::NEG_INFINITY)).is_err());
    }

    #[test]
    fn test_single_gamma_dominates() {
        let result = classify(powers(0.0, 0.0, 0.0, 0.0, 5.0)).unwrap();
        assert_eq!(result.dominant, EegBand::Gamma);
        assert_eq!(result.state, AttentionState::HighlyEngaged);
    }

    #[test]
    fn test_near_tie_within_epsilon() {
        let input = powers(0.0, 0.0, 4.995, 5.0, 0.0);

        let result = classify_with_epsilon(input, 0.01).unwrap();
        assert_eq!(result.dominant, EegBand::Alpha);
        assert_eq!(result.state, AttentionState::Calm);

        // Exact-tie classifier keeps the strict maximum
        let result = classify(input).unwrap();
        assert_eq!(result.dominant, EegBand::Beta);
    }

    #[test]
    fn test_invalid_epsilon_rejected() {
        let input = powers(1.0, 0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            classify_with_epsilon(input, -0.1),
            Err(ClassifyError::InvalidInput { field: "epsilon", .. })
        ));
        assert!(classify_with_epsilon(input, f64::NAN).is_err());
        assert!(ClassifierConfig::with_epsilon(f64::INFINITY).is_err());
        assert!(StateClassifier::new(ClassifierConfig { epsilon: -1.0 }).is_err());
    }

    #[test]
    fn test_dominant_band_helper() {
        let input = powers(0.0, 2.95, 3.0, 0.0, 0.0);
        assert_eq!(dominant_band(&input, 0.0).unwrap(), EegBand::Alpha);
        assert_eq!(dominant_band(&input, 0.1).unwrap(), EegBand::Theta);
        assert!(dominant_band(&powers(0.0, -3.0, 0.0, 0.0, 0.0), 0.0).is_err());
    }

    #[test]
    fn test_configured_classifier() {
        let classifier = StateClassifier::new(ClassifierConfig::with_epsilon(0.5).unwrap()).unwrap();
        assert!((classifier.epsilon() - 0.5).abs() < f64::EPSILON);

        let result = classifier.classify(powers(0.0, 0.0, 0.0, 2.6, 3.0)).unwrap();
        assert_eq!(result.dominant, EegBand::Beta);
        assert_eq!(result.state, AttentionState::Focused);
    }
}
