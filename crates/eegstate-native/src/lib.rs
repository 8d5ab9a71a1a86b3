//! EEG State Native - Host-side EEG analysis
//!
//! This crate turns multichannel EEG recordings into attention states:
//! - Preprocessing (zero-phase band-pass, average reference)
//! - Welch PSD and per-band power
//! - Whole-recording and chunked (live-style) classification
//! - Recording discovery and monitoring session state
//! - Seeded synthetic recordings
//!
//! # Modules
//!
//! - [`processing`]: Filters and spectral estimation
//! - [`analysis`]: Whole-recording pipeline
//! - [`streaming`]: Windowed replay of a recording
//! - [`recording`]: In-memory recordings and recording sources
//! - [`session`]: Selection and bounded classification history

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod processing;
pub mod recording;
pub mod session;
pub mod simulation;
pub mod streaming;

// Re-export key types
pub use analysis::{analyze_recording, RecordingAnalysis};
pub use config::{AnalysisConfig, FilterConfig, SpectralConfig, StreamingConfig};
pub use error::{AnalysisError, AnalysisResult};
pub use recording::{
    directory_summary, DirectoryScanner, DirectorySummary, Recording, RecordingId,
    RecordingSource, StaticSource,
};
pub use session::{HistoryEntry, MonitorSession};
pub use simulation::{generate, SyntheticConfig};
pub use streaming::{ChunkAnalysis, ChunkedAnalyzer};
