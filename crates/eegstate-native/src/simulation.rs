//! Synthetic EEG recordings
//!
//! Generates multichannel recordings in which one chosen band dominates,
//! for demos, tests and benchmarks. Each channel is Gaussian noise plus
//! three sinusoids per band; the dominant band gets large amplitudes and
//! the rest small ones. Generation is seeded and reproducible.

use std::f64::consts::PI;

use eegstate_core::EegBand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalysisResult;
use crate::recording::Recording;

/// Standard 10-20 labels used for the first 32 channels
pub const CHANNEL_NAMES_10_20: [&str; 32] = [
    "Fp1", "Fp2", "F7", "F3", "Fz", "F4", "F8", "FC5", "FC1", "FC2", "FC6", "T7", "C3", "Cz",
    "C4", "T8", "TP9", "CP5", "CP1", "CP2", "CP6", "TP10", "P7", "P3", "Pz", "P4", "P8", "PO9",
    "O1", "Oz", "O2", "PO10",
];

/// Synthetic recording parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Number of channels
    pub n_channels: usize,
    /// Sample rate (Hz)
    pub sample_rate: f64,
    /// Duration (seconds)
    pub duration_secs: f64,
    /// Band given the large amplitudes
    pub dominant: EegBand,
    /// Standard deviation of additive noise (µV)
    pub noise_uv: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_channels: 32,
            sample_rate: 256.0,
            duration_secs: 60.0,
            dominant: EegBand::Alpha,
            noise_uv: 5.0,
            seed: 12345,
        }
    }
}

/// Component frequencies (Hz) injected for each band
#[must_use]
pub const fn band_frequencies(band: EegBand) -> [f64; 3] {
    match band {
        EegBand::Delta => [1.0, 2.0, 3.0],
        EegBand::Theta => [5.0, 6.0, 7.0],
        EegBand::Alpha => [9.0, 10.0, 11.0],
        EegBand::Beta => [15.0, 20.0, 25.0],
        EegBand::Gamma => [35.0, 40.0, 45.0],
    }
}

/// Generate a synthetic recording.
///
/// Degenerate parameters are clamped: at least one channel and two
/// samples, and non-negative noise.
///
/// # Errors
///
/// Returns an error if the sample rate is not positive.
pub fn generate(config: &SyntheticConfig) -> AnalysisResult<Recording> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let sample_rate = config.sample_rate;
    let n_channels = config.n_channels.max(1);
    let n_samples = ((sample_rate * config.duration_secs) as usize).max(2);
    let noise_uv = if config.noise_uv.is_finite() { config.noise_uv.max(0.0) } else { 0.0 };

    let channels = (0..n_channels)
        .map(|_| {
            let mut signal: Vec<f64> = (0..n_samples)
                .map(|_| noise_uv * rng.sample::<f64, _>(StandardNormal))
                .collect();

            for band in EegBand::ALL {
                for freq in band_frequencies(band) {
                    let amplitude = if band == config.dominant {
                        rng.gen_range(15.0..25.0)
                    } else {
                        rng.gen_range(3.0..8.0)
                    };
                    let phase = rng.gen_range(0.0..2.0 * PI);
                    let omega = 2.0 * PI * freq / sample_rate;

                    for (i, s) in signal.iter_mut().enumerate() {
                        *s += amplitude * (omega * i as f64 + phase).sin();
                    }
                }
            }

            let channel_factor = 0.8 + 0.4 * rng.gen::<f64>();
            signal.iter_mut().for_each(|s| *s *= channel_factor);
            signal
        })
        .collect();

    let names = (0..n_channels)
        .map(|i| {
            CHANNEL_NAMES_10_20
                .get(i)
                .map_or_else(|| format!("Ch{}", i + 1), |name| (*name).to_string())
        })
        .collect();

    debug!(
        "Generated synthetic recording: {} channels, {} samples, {} dominant",
        n_channels, n_samples, config.dominant
    );

    Recording::new(sample_rate, names, channels)
}
