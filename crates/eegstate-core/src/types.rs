//! Core types for the EEG attention analyzer
//!
//! This module provides the value types shared by every tier:
//! - EEG frequency bands and their fixed priority order
//! - Per-window band powers and derived ratios
//! - Attention states and classification results

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

// ============================================================================
// EEG Frequency Bands
// ============================================================================

/// Standard EEG frequency band definitions.
///
/// Declaration order is the tie-break priority used by the classifier:
/// Delta wins over Theta, Theta over Alpha, and so on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EegBand {
    /// Delta: 0.5-4 Hz (deep sleep)
    Delta,
    /// Theta: 4-8 Hz (drowsiness, memory)
    Theta,
    /// Alpha: 8-13 Hz (relaxed, eyes closed)
    Alpha,
    /// Beta: 13-30 Hz (active thinking)
    Beta,
    /// Gamma: 30-45 Hz (cognitive processing)
    Gamma,
}

impl EegBand {
    /// All bands in priority order
    pub const ALL: [Self; 5] = [Self::Delta, Self::Theta, Self::Alpha, Self::Beta, Self::Gamma];

    /// Get the frequency range for this band (low, high) in Hz
    #[inline]
    #[must_use]
    pub const fn range_hz(self) -> (f64, f64) {
        match self {
            Self::Delta => (0.5, 4.0),
            Self::Theta => (4.0, 8.0),
            Self::Alpha => (8.0, 13.0),
            Self::Beta => (13.0, 30.0),
            Self::Gamma => (30.0, 45.0),
        }
    }

    /// Get the band name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Delta => "Delta",
            Self::Theta => "Theta",
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::Gamma => "Gamma",
        }
    }

    /// Attention state this band maps to when it dominates
    #[inline]
    #[must_use]
    pub const fn state(self) -> AttentionState {
        AttentionState::from_band(self)
    }

    /// Parse a band from its name (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for EegBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Band Powers
// ============================================================================

/// Mean spectral power per EEG band over one analysis window.
///
/// Values are in the estimator's unit (µV²/Hz for the Welch estimator).
/// A valid record holds five finite, non-negative values; construction does
/// not enforce this, [`BandPowers::validate`] and the classifier do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPowers {
    /// Delta band power (0.5-4 Hz)
    pub delta: f64,
    /// Theta band power (4-8 Hz)
    pub theta: f64,
    /// Alpha band power (8-13 Hz)
    pub alpha: f64,
    /// Beta band power (13-30 Hz)
    pub beta: f64,
    /// Gamma band power (30-45 Hz)
    pub gamma: f64,
}

impl BandPowers {
    /// Create a band power record
    #[inline]
    #[must_use]
    pub const fn new(delta: f64, theta: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { delta, theta, alpha, beta, gamma }
    }

    /// Power of a single band
    #[inline]
    #[must_use]
    pub const fn get(&self, band: EegBand) -> f64 {
        match band {
            EegBand::Delta => self.delta,
            EegBand::Theta => self.theta,
            EegBand::Alpha => self.alpha,
            EegBand::Beta => self.beta,
            EegBand::Gamma => self.gamma,
        }
    }

    /// Iterate `(band, power)` pairs in priority order
    pub fn iter(&self) -> impl Iterator<Item = (EegBand, f64)> + '_ {
        EegBand::ALL.into_iter().map(move |band| (band, self.get(band)))
    }

    /// Total power across all bands
    #[must_use]
    pub fn total(&self) -> f64 {
        self.delta + self.theta + self.alpha + self.beta + self.gamma
    }

    /// Band powers normalized to total power.
    ///
    /// Returns all zeros when the total is zero.
    #[must_use]
    pub fn relative(&self) -> Self {
        let total = self.total();

        if total > 0.0 {
            Self {
                delta: self.delta / total,
                theta: self.theta / total,
                alpha: self.alpha / total,
                beta: self.beta / total,
                gamma: self.gamma / total,
            }
        } else {
            Self::default()
        }
    }

    /// Common inter-band ratios
    #[must_use]
    pub fn ratios(&self) -> BandRatios {
        BandRatios {
            alpha_beta: ratio(self.alpha, self.beta),
            theta_beta: ratio(self.theta, self.beta),
            delta_alpha: ratio(self.delta, self.alpha),
        }
    }

    /// Check that every band power is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidInput`] naming the first offending band.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        for (band, value) in self.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(ClassifyError::InvalidInput { field: band.name(), value });
            }
        }
        Ok(())
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

/// Inter-band power ratios.
///
/// A ratio is `None` when its denominator band carries no power.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandRatios {
    /// Alpha/Beta (relaxation vs. engagement)
    pub alpha_beta: Option<f64>,
    /// Theta/Beta (attention regulation)
    pub theta_beta: Option<f64>,
    /// Delta/Alpha (drowsiness)
    pub delta_alpha: Option<f64>,
}

// ============================================================================
// Attention States
// ============================================================================

/// Coarse attentional state derived from the dominant band.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttentionState {
    /// Delta dominant
    Sleepy,
    /// Theta dominant
    Relaxed,
    /// Alpha dominant
    Calm,
    /// Beta dominant
    Focused,
    /// Gamma dominant
    HighlyEngaged,
}

impl AttentionState {
    /// All states, in the order of the bands they map from
    pub const ALL: [Self; 5] =
        [Self::Sleepy, Self::Relaxed, Self::Calm, Self::Focused, Self::HighlyEngaged];

    /// Fixed band-to-state lookup
    #[inline]
    #[must_use]
    pub const fn from_band(band: EegBand) -> Self {
        match band {
            EegBand::Delta => Self::Sleepy,
            EegBand::Theta => Self::Relaxed,
            EegBand::Alpha => Self::Calm,
            EegBand::Beta => Self::Focused,
            EegBand::Gamma => Self::HighlyEngaged,
        }
    }

    /// The band that maps to this state
    #[inline]
    #[must_use]
    pub const fn band(self) -> EegBand {
        match self {
            Self::Sleepy => EegBand::Delta,
            Self::Relaxed => EegBand::Theta,
            Self::Calm => EegBand::Alpha,
            Self::Focused => EegBand::Beta,
            Self::HighlyEngaged => EegBand::Gamma,
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sleepy => "Sleepy",
            Self::Relaxed => "Relaxed",
            Self::Calm => "Calm",
            Self::Focused => "Focused",
            Self::HighlyEngaged => "Highly engaged",
        }
    }

    /// Short description for presentation
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Sleepy => "Deep sleep or very drowsy state",
            Self::Relaxed => "Relaxed, meditative or drowsy state",
            Self::Calm => "Calm, relaxed but alert state",
            Self::Focused => "Active concentration and focused attention",
            Self::HighlyEngaged => "High-level cognitive processing",
        }
    }
}

impl fmt::Display for AttentionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Classification Result
// ============================================================================

/// Outcome of classifying one analysis window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The classified band powers
    pub powers: BandPowers,
    /// Band that produced the decision
    pub dominant: EegBand,
    /// Mapped attention state
    pub state: AttentionState,
}

// ============================================================================
// Tests
// ============================================================================
