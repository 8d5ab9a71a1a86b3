//! FFT-based spectral analysis
//!
//! Welch power spectral density and band power extraction. The PSD is
//! one-sided with density scaling (µV²/Hz for µV input), using a periodic
//! Hann window and per-segment mean removal.

use std::sync::Arc;

use eegstate_core::{BandPowers, EegBand};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::config::SpectralConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::recording::Recording;

/// Welch PSD estimator
pub struct WelchEstimator {
    sample_rate: f64,
    segment_len: usize,
    step: usize,
    window: Vec<f64>,
    /// Density scale `1 / (fs * Σw²)`
    scale: f64,
    fft: Arc<dyn Fft<f64>>,
}

impl WelchEstimator {
    /// Create an estimator for signals of `n_samples` samples
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `config` - Segment length (seconds) and overlap fraction
    /// * `n_samples` - Signal length; the segment is clipped to it
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientData`] for signals shorter than
    /// two samples.
    pub fn new(sample_rate: f64, config: &SpectralConfig, n_samples: usize) -> AnalysisResult<Self> {
        if n_samples < 2 {
            return Err(AnalysisError::InsufficientData { got: n_samples, need: 2 });
        }

        let requested = (config.window_secs * sample_rate).round() as usize;
        let segment_len = requested.clamp(2, n_samples);
        let overlap = (segment_len as f64 * config.overlap).floor() as usize;
        let step = (segment_len - overlap).max(1);

        let window = hann_window(segment_len);
        let scale = 1.0 / (sample_rate * window.iter().map(|w| w * w).sum::<f64>());

        let fft = FftPlanner::new().plan_fft_forward(segment_len);

        Ok(Self { sample_rate, segment_len, step, window, scale, fft })
    }

    /// Samples per Welch segment
    #[inline]
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Frequency resolution (Hz per bin)
    #[must_use]
    pub fn frequency_resolution(&self) -> f64 {
        self.sample_rate / self.segment_len as f64
    }

    /// Compute the averaged one-sided PSD of a signal.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientData`] if the signal is shorter
    /// than one segment.
    pub fn psd(&self, samples: &[f64]) -> AnalysisResult<Spectrum> {
        if samples.len() < self.segment_len {
            return Err(AnalysisError::InsufficientData {
                got: samples.len(),
                need: self.segment_len,
            });
        }

        let n = self.segment_len;
        let n_freqs = n / 2 + 1;
        let mut power = vec![0.0; n_freqs];
        let mut buffer = vec![Complex::new(0.0, 0.0); n];
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];
        let mut segments = 0usize;

        for start in (0..=samples.len() - n).step_by(self.step) {
            let segment = &samples[start..start + n];
            let mean = segment.iter().sum::<f64>() / n as f64;

            for ((slot, &s), &w) in buffer.iter_mut().zip(segment).zip(&self.window) {
                *slot = Complex::new((s - mean) * w, 0.0);
            }

            self.fft.process_with_scratch(&mut buffer, &mut scratch);

            for (p, c) in power.iter_mut().zip(&buffer[..n_freqs]) {
                *p += c.norm_sqr();
            }
            segments += 1;
        }

        // One-sided: fold negative frequencies except DC and even-length Nyquist
        let last_doubled = if n % 2 == 0 { n_freqs - 1 } else { n_freqs };
        let norm = self.scale / segments as f64;
        for (k, p) in power.iter_mut().enumerate() {
            *p *= norm;
            if k > 0 && k < last_doubled {
                *p *= 2.0;
            }
        }

        let res = self.frequency_resolution();
        let freqs = (0..n_freqs).map(|k| k as f64 * res).collect();

        Ok(Spectrum { freqs, power })
    }
}

/// One-sided power spectrum
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Bin centre frequencies (Hz)
    pub freqs: Vec<f64>,
    /// Power density per bin
    pub power: Vec<f64>,
}

impl Spectrum {
    /// Mean power of bins with `low_hz <= f <= high_hz`; 0 if none qualify
    #[must_use]
    pub fn mean_power(&self, low_hz: f64, high_hz: f64) -> f64 {
        let (sum, count) = self
            .freqs
            .iter()
            .zip(&self.power)
            .filter(|&(&f, _)| f >= low_hz && f <= high_hz)
            .fold((0.0, 0usize), |(sum, count), (_, &p)| (sum + p, count + 1));

        if count > 0 {
            sum / count as f64
        } else {
            0.0
        }
    }

    /// Mean power of a standard EEG band
    #[must_use]
    pub fn band_power(&self, band: EegBand) -> f64 {
        let (low, high) = band.range_hz();
        self.mean_power(low, high)
    }

    /// All standard EEG band powers
    #[must_use]
    pub fn band_powers(&self) -> BandPowers {
        BandPowers {
            delta: self.band_power(EegBand::Delta),
            theta: self.band_power(EegBand::Theta),
            alpha: self.band_power(EegBand::Alpha),
            beta: self.band_power(EegBand::Beta),
            gamma: self.band_power(EegBand::Gamma),
        }
    }

    /// Bin-wise mean of spectra sharing one frequency grid.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn average(spectra: &[Self]) -> Option<Self> {
        let first = spectra.first()?;
        let mut power = vec![0.0; first.power.len()];

        for spectrum in spectra {
            for (acc, p) in power.iter_mut().zip(&spectrum.power) {
                *acc += p;
            }
        }

        let n = spectra.len() as f64;
        power.iter_mut().for_each(|p| *p /= n);

        Some(Self { freqs: first.freqs.clone(), power })
    }
}

/// Channel-averaged PSD of a recording
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] for recordings shorter than
/// two samples.
pub fn recording_spectrum(recording: &Recording, config: &SpectralConfig) -> AnalysisResult<Spectrum> {
    let estimator = WelchEstimator::new(recording.sample_rate(), config, recording.n_samples())?;

    let spectra = recording
        .channels()
        .iter()
        .map(|ch| estimator.psd(ch))
        .collect::<AnalysisResult<Vec<_>>>()?;

    Spectrum::average(&spectra).ok_or(AnalysisError::EmptyRecording)
}

/// Band powers of the channel-averaged PSD
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] for recordings shorter than
/// two samples.
pub fn estimate_band_powers(recording: &Recording, config: &SpectralConfig) -> AnalysisResult<BandPowers> {
    Ok(recording_spectrum(recording, config)?.band_powers())
}

/// Generate periodic Hann window coefficients
fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / size as f64).cos()))
        .collect()
}
