//! Digital filters for EEG preprocessing
//!
//! Provides floating-point Butterworth sections, a zero-phase band-pass for
//! whole channels, and common-average re-referencing.

use tracing::debug;

use crate::config::FilterConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::recording::Recording;

/// Butterworth IIR filter coefficients (second-order section)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoeffs {
    /// Numerator coefficients [b0, b1, b2]
    pub b: [f64; 3],
    /// Denominator coefficients [a0=1, a1, a2]
    pub a: [f64; 3],
}

/// Second-order biquad filter section (direct form I)
#[derive(Clone, Debug)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    /// Input history: [x1, x2]
    inputs: [f64; 2],
    /// Output history: [y1, y2]
    outputs: [f64; 2],
}

impl Biquad {
    /// Create a new biquad section with given coefficients
    #[must_use]
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self { coeffs, inputs: [0.0; 2], outputs: [0.0; 2] }
    }

    /// Create a second-order Butterworth lowpass filter
    #[must_use]
    pub fn lowpass(sample_rate: f64, cutoff: f64) -> Self {
        let k = (std::f64::consts::PI * cutoff / sample_rate).tan();
        let k2 = k * k;
        let sqrt2 = std::f64::consts::SQRT_2;

        let norm = 1.0 / (1.0 + sqrt2 * k + k2);

        Self::new(BiquadCoeffs {
            b: [k2 * norm, 2.0 * k2 * norm, k2 * norm],
            a: [1.0, 2.0 * (k2 - 1.0) * norm, (1.0 - sqrt2 * k + k2) * norm],
        })
    }

    /// Create a second-order Butterworth highpass filter
    #[must_use]
    pub fn highpass(sample_rate: f64, cutoff: f64) -> Self {
        let k = (std::f64::consts::PI * cutoff / sample_rate).tan();
        let k2 = k * k;
        let sqrt2 = std::f64::consts::SQRT_2;

        let norm = 1.0 / (1.0 + sqrt2 * k + k2);

        Self::new(BiquadCoeffs {
            b: [norm, -2.0 * norm, norm],
            a: [1.0, 2.0 * (k2 - 1.0) * norm, (1.0 - sqrt2 * k + k2) * norm],
        })
    }

    /// Coefficients of this section
    #[must_use]
    pub fn coeffs(&self) -> BiquadCoeffs {
        self.coeffs
    }

    /// Process a single sample
    pub fn filter(&mut self, input: f64) -> f64 {
        let BiquadCoeffs { b, a } = self.coeffs;
        let output = b[0] * input + b[1] * self.inputs[0] + b[2] * self.inputs[1]
            - a[1] * self.outputs[0]
            - a[2] * self.outputs[1];

        self.inputs = [input, self.inputs[0]];
        self.outputs = [output, self.outputs[0]];

        output
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.inputs = [0.0; 2];
        self.outputs = [0.0; 2];
    }
}

/// Band-pass filter built from a highpass and a lowpass section
#[derive(Clone, Debug)]
pub struct BandpassFilter {
    highpass: Biquad,
    lowpass: Biquad,
}

impl BandpassFilter {
    /// Create a bandpass filter for a frequency range.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidFilterConfig`] unless
    /// `0 < low_hz < high_hz < sample_rate / 2`.
    pub fn new(sample_rate: f64, low_hz: f64, high_hz: f64) -> AnalysisResult<Self> {
        let invalid = |reason| AnalysisError::InvalidFilterConfig {
            low_hz,
            high_hz,
            sample_rate,
            reason,
        };

        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(invalid("sample rate must be positive"));
        }
        if !(low_hz > 0.0 && low_hz < high_hz) {
            return Err(invalid("need 0 < low < high"));
        }
        if high_hz >= sample_rate / 2.0 {
            return Err(invalid("low-pass cutoff must be below Nyquist"));
        }

        Ok(Self {
            highpass: Biquad::highpass(sample_rate, low_hz),
            lowpass: Biquad::lowpass(sample_rate, high_hz),
        })
    }

    /// Process a single sample
    pub fn filter(&mut self, input: f64) -> f64 {
        let hp_out = self.highpass.filter(input);
        self.lowpass.filter(hp_out)
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.highpass.reset();
        self.lowpass.reset();
    }

    /// Filter a whole channel forward then backward, cancelling phase shift
    pub fn filter_zero_phase(&mut self, samples: &mut [f64]) {
        self.reset();
        for s in samples.iter_mut() {
            *s = self.filter(*s);
        }

        self.reset();
        for s in samples.iter_mut().rev() {
            *s = self.filter(*s);
        }

        self.reset();
    }
}

/// Subtract the across-channel mean from every channel, sample by sample.
///
/// Channels must have equal length; a single channel becomes all zeros.
pub fn average_reference(channels: &mut [Vec<f64>]) {
    let Some(n_samples) = channels.first().map(Vec::len) else {
        return;
    };
    let n_channels = channels.len() as f64;

    for i in 0..n_samples {
        let mean = channels.iter().map(|ch| ch[i]).sum::<f64>() / n_channels;
        for ch in channels.iter_mut() {
            ch[i] -= mean;
        }
    }
}

/// Re-reference and band-pass a recording, returning a filtered copy.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidFilterConfig`] if the cutoffs do not fit
/// the recording's sample rate.
pub fn preprocess(recording: &Recording, config: &FilterConfig) -> AnalysisResult<Recording> {
    let mut filter = BandpassFilter::new(recording.sample_rate(), config.low_hz, config.high_hz)?;
    let mut channels = recording.channels().to_vec();

    if config.average_reference && channels.len() > 1 {
        average_reference(&mut channels);
        debug!("Applied average reference across {} channels", channels.len());
    }

    for ch in &mut channels {
        filter.filter_zero_phase(ch);
    }
    debug!("Applied band-pass filter: {}-{} Hz", config.low_hz, config.high_hz);

    Recording::new(recording.sample_rate(), recording.channel_names().to_vec(), channels)
}
