//! Monitoring session state
//!
//! A [`MonitorSession`] holds everything a monitoring front end needs
//! between updates: the analysis configuration, where recordings come from,
//! which recording is selected and a bounded history of classifications.

use std::collections::VecDeque;

use eegstate_core::{AttentionState, BandPowers, ClassificationResult, EegBand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::recording::{RecordingId, RecordingSource};

/// One classification in the session history
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Recording time of the classified window end (seconds)
    pub time_secs: f64,
    /// Band powers of the window
    pub band_powers: BandPowers,
    /// Attention state
    pub state: AttentionState,
    /// Dominant band
    pub dominant: EegBand,
}

impl HistoryEntry {
    /// Build an entry from a classification at `time_secs`
    pub fn new(time_secs: f64, result: &ClassificationResult) -> Self {
        Self {
            time_secs,
            band_powers: result.powers,
            state: result.state,
            dominant: result.dominant,
        }
    }
}

/// Session over a source of recordings
pub struct MonitorSession<S: RecordingSource> {
    config: AnalysisConfig,
    source: S,
    selected: Option<RecordingId>,
    history: VecDeque<HistoryEntry>,
}

impl<S: RecordingSource> MonitorSession<S> {
    /// Create a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: AnalysisConfig, source: S) -> AnalysisResult<Self> {
        config.validate()?;
        let history = VecDeque::with_capacity(config.streaming.history_len);
        Ok(Self { config, source, selected: None, history })
    }

    /// Session configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Enumerate the recordings currently offered by the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    pub fn scan(&self) -> AnalysisResult<Vec<RecordingId>> {
        let ids: Vec<_> = self.source.recordings()?.collect();
        info!("Found {} recordings", ids.len());
        Ok(ids)
    }

    /// Select a recording and start a fresh history.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownRecording`] if the source does not
    /// offer `id`. The previous selection is kept in that case.
    pub fn select(&mut self, id: RecordingId) -> AnalysisResult<()> {
        if !self.source.recordings()?.any(|candidate| candidate == id) {
            return Err(AnalysisError::UnknownRecording(id.to_string()));
        }

        debug!("Selected recording {id}");
        self.selected = Some(id);
        self.history.clear();
        Ok(())
    }

    /// Currently selected recording
    pub fn selected(&self) -> Option<&RecordingId> {
        self.selected.as_ref()
    }

    /// Append a classification, dropping the oldest beyond `history_len`
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.history.len() == self.config.streaming.history_len {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    /// History, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + '_ {
        self.history.iter()
    }

    /// State of the most recent entry
    pub fn latest_state(&self) -> Option<AttentionState> {
        self.history.back().map(|entry| entry.state)
    }

    /// Drop all history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::StaticSource;
    use eegstate_core::classify;

    fn session(history_len: usize) -> MonitorSession<StaticSource> {
        let mut config = AnalysisConfig::default();
        config.streaming.history_len = history_len;
        let source = StaticSource::new(["a.bdf", "b.bdf"].map(RecordingId::new));
        MonitorSession::new(config, source).unwrap()
    }

    fn entry(time_secs: f64, alpha: f64) -> HistoryEntry {
        let result = classify(BandPowers::new(1.0, 1.0, alpha, 2.0, 0.5)).unwrap();
        HistoryEntry::new(time_secs, &result)
    }

    #[test]
    fn test_scan_lists_source() {
        let ids = session(5).scan().unwrap();
        assert_eq!(ids, vec![RecordingId::new("a.bdf"), RecordingId::new("b.bdf")]);
    }

    #[test]
    fn test_select_known_and_unknown() {
        let mut session = session(5);
        assert!(session.selected().is_none());

        session.select(RecordingId::new("b.bdf")).unwrap();
        assert_eq!(session.selected(), Some(&RecordingId::new("b.bdf")));

        let err = session.select(RecordingId::new("c.bdf")).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownRecording(_)));
        assert_eq!(session.selected(), Some(&RecordingId::new("b.bdf")));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = session(3);
        for i in 0..5 {
            session.record(entry(f64::from(i) * 3.0, 10.0));
        }

        let times: Vec<f64> = session.history().map(|e| e.time_secs).collect();
        assert_eq!(times, vec![6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_latest_state_and_clear() {
        let mut session = session(10);
        assert!(session.latest_state().is_none());

        session.record(entry(0.0, 10.0));
        assert_eq!(session.latest_state(), Some(AttentionState::Calm));

        // Alpha below beta: beta dominates
        session.record(entry(3.0, 0.1));
        assert_eq!(session.latest_state(), Some(AttentionState::Focused));

        session.clear_history();
        assert_eq!(session.history().len(), 0);
        assert!(session.latest_state().is_none());
    }

    #[test]
    fn test_select_resets_history() {
        let mut session = session(10);
        session.record(entry(0.0, 10.0));
        session.select(RecordingId::new("a.bdf")).unwrap();
        assert_eq!(session.history().len(), 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.streaming.history_len = 0;
        assert!(MonitorSession::new(config, StaticSource::default()).is_err());
    }
}
