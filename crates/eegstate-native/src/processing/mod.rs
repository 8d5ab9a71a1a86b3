//! Signal processing pipelines
//!
//! This module provides signal processing for EEG recordings:
//! - [`filters`]: Butterworth band-pass and average re-referencing
//! - [`spectral`]: Welch PSD and band power

pub mod filters;
pub mod spectral;

pub use filters::{average_reference, preprocess, BandpassFilter, Biquad};
pub use spectral::{estimate_band_powers, recording_spectrum, Spectrum, WelchEstimator};
