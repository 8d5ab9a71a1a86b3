//! EEG State Core - `no_std` compatible band-power types and classifier
//!
//! This crate provides the foundational types and the attention-state
//! decision procedure for the EEG analyzer. It has no I/O and no
//! allocation, so it works in `no_std` environments as well as on the host.
//!
//! # Modules
//!
//! - [`types`]: Frequency bands, band powers, attention states
//! - [`error`]: Classification error type
//! - [`classifier`]: Dominant-band classification with a fixed tie-break
//!
//! # Features
//!
//! - `std`: Enable standard library support (`std::error::Error` impls)
//!
//! # Example
//!
//! ```rust
//! use eegstate_core::{classify, AttentionState, BandPowers, EegBand};
//!
//! let powers = BandPowers::new(0.0, 0.0, 0.0, 0.0, 5.0);
//! let result = classify(powers).unwrap();
//! assert_eq!(result.dominant, EegBand::Gamma);
//! assert_eq!(result.state, AttentionState::HighlyEngaged);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[cfg(feature = "std")]
extern crate std;

pub mod classifier;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use classifier::{classify, classify_with_epsilon, dominant_band, ClassifierConfig, StateClassifier};
pub use error::ClassifyError;
pub use types::{AttentionState, BandPowers, BandRatios, ClassificationResult, EegBand};
