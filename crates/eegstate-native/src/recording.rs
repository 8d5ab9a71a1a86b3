//! EEG recordings and recording discovery
//!
//! A [`Recording`] is plain numeric data: a sample rate, channel labels and
//! one sample vector per channel (µV). Decoding files into recordings is
//! left to the caller; this module only finds candidate files.
//!
//! Discovery goes through the [`RecordingSource`] capability so analysis
//! code never touches the filesystem directly:
//!
//! - [`DirectoryScanner`]: recursive walk for `.bdf` files
//! - [`StaticSource`]: a fixed list, for tests and injected sources

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, AnalysisResult};

/// File extension of recordings found by [`DirectoryScanner`]
pub const RECORDING_EXTENSION: &str = "bdf";

// ============================================================================
// Recording
// ============================================================================

/// Multichannel EEG recording held in memory
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    sample_rate: f64,
    channel_names: Vec<String>,
    channels: Vec<Vec<f64>>,
}

impl Recording {
    /// Create a recording.
    ///
    /// Missing channel names are filled in as `Ch{n}`; extra names are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample rate is not positive, there are no
    /// channels or samples, or channels differ in length.
    pub fn new(
        sample_rate: f64,
        mut channel_names: Vec<String>,
        channels: Vec<Vec<f64>>,
    ) -> AnalysisResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::InvalidConfig {
                parameter: "sample_rate",
                reason: format!("must be > 0, got {sample_rate}"),
            });
        }

        let expected = channels.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(AnalysisError::EmptyRecording);
        }
        if let Some((channel, ch)) = channels.iter().enumerate().find(|(_, ch)| ch.len() != expected)
        {
            return Err(AnalysisError::ChannelLengthMismatch { channel, got: ch.len(), expected });
        }

        channel_names.truncate(channels.len());
        for i in channel_names.len()..channels.len() {
            channel_names.push(format!("Ch{}", i + 1));
        }

        Ok(Self { sample_rate, channel_names, channels })
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Channel labels
    #[inline]
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    /// Per-channel samples
    #[inline]
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Number of channels
    #[inline]
    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.channels[0].len()
    }

    /// Time of the last sample in seconds
    pub fn duration_secs(&self) -> f64 {
        (self.n_samples() - 1) as f64 / self.sample_rate
    }

    /// Copy of the sample range `[start, end)`, clamped to the recording.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyRecording`] if the clamped range is empty.
    pub fn slice(&self, start: usize, end: usize) -> AnalysisResult<Self> {
        let end = end.min(self.n_samples());
        let start = start.min(end);

        Self::new(
            self.sample_rate,
            self.channel_names.clone(),
            self.channels.iter().map(|ch| ch[start..end].to_vec()).collect(),
        )
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Identifier of a discoverable recording
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordingId(PathBuf);

impl RecordingId {
    /// Create an id from a path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Underlying path
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Source of recording identifiers.
///
/// Each call to [`recordings`](RecordingSource::recordings) starts a fresh,
/// finite sequence.
pub trait RecordingSource {
    /// Enumerate available recordings.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened.
    fn recordings(&self) -> AnalysisResult<Box<dyn Iterator<Item = RecordingId> + '_>>;
}

/// Fixed list of recordings
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    ids: Vec<RecordingId>,
}

impl StaticSource {
    /// Create a source from ids
    pub fn new(ids: impl IntoIterator<Item = RecordingId>) -> Self {
        Self { ids: ids.into_iter().collect() }
    }
}

impl RecordingSource for StaticSource {
    fn recordings(&self) -> AnalysisResult<Box<dyn Iterator<Item = RecordingId> + '_>> {
        Ok(Box::new(self.ids.iter().cloned()))
    }
}

/// Recursive directory walk yielding `.bdf` files.
///
/// Entries are visited depth-first with each directory's entries sorted by
/// path, so the order is stable between calls. Unreadable subdirectories
/// are logged and skipped.
#[derive(Clone, Debug)]
pub struct DirectoryScanner {
    root: PathBuf,
}

impl DirectoryScanner {
    /// Create a scanner rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordingSource for DirectoryScanner {
    fn recordings(&self) -> AnalysisResult<Box<dyn Iterator<Item = RecordingId> + '_>> {
        if !self.root.is_dir() {
            warn!("Directory does not exist: {}", self.root.display());
            return Ok(Box::new(std::iter::empty()));
        }

        info!("Scanning directory: {}", self.root.display());
        let top = sorted_entries(&self.root)?;

        Ok(Box::new(Walk { stack: vec![top.into_iter()] }))
    }
}

struct Walk {
    stack: Vec<std::vec::IntoIter<Entry>>,
}

impl Iterator for Walk {
    type Item = RecordingId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.stack.last_mut()?.next() {
                Some(entry) => entry,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            match entry.kind {
                EntryKind::Dir => {
                    if let Some(entries) = read_subdirectory(&entry.path) {
                        self.stack.push(entries.into_iter());
                    }
                }
                EntryKind::File if is_recording(&entry.path) => {
                    debug!("Found recording {}", entry.path.display());
                    return Some(RecordingId(entry.path));
                }
                EntryKind::File | EntryKind::Other => {}
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    Other,
}

#[derive(Clone, Debug)]
struct Entry {
    path: PathBuf,
    kind: EntryKind,
}

impl Entry {
    /// Classify without following directory symlinks. A symlink to a file
    /// counts as a file; a symlink to a directory is never descended.
    fn from_dir_entry(entry: &fs::DirEntry) -> std::io::Result<Self> {
        let path = entry.path();
        let file_type = entry.file_type()?;

        let kind = if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Ok(Self { path, kind })
    }
}

fn sorted_entries(dir: &Path) -> AnalysisResult<Vec<Entry>> {
    let io_err = |source| AnalysisError::Io { path: dir.to_path_buf(), source };

    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.and_then(|e| Entry::from_dir_entry(&e)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// Entries of a directory below the root; unreadable ones are logged and skipped
fn read_subdirectory(dir: &Path) -> Option<Vec<Entry>> {
    match sorted_entries(dir) {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!("Skipping unreadable directory: {e}");
            None
        }
    }
}

fn is_recording(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORDING_EXTENSION))
}

// ============================================================================
// Directory summary
// ============================================================================

/// File counts below a directory
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySummary {
    /// All regular files
    pub total_files: usize,
    /// Files with the recording extension
    pub recording_files: usize,
    /// Subdirectories relative to the root, sorted
    pub subdirectories: Vec<PathBuf>,
    /// File count per lowercase extension (`""` for none)
    pub files_by_extension: BTreeMap<String, usize>,
}

impl DirectorySummary {
    fn add_file(&mut self, path: &Path) {
        self.total_files += 1;
        if is_recording(path) {
            self.recording_files += 1;
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        *self.files_by_extension.entry(ext).or_insert(0) += 1;
    }
}

/// Summarize the files below `root`.
///
/// Symlinked directories are not followed. Unreadable subdirectories are
/// logged and skipped, as in [`DirectoryScanner`].
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if `root` itself cannot be read.
pub fn directory_summary(root: &Path) -> AnalysisResult<DirectorySummary> {
    let top = sorted_entries(root)?;
    Ok(summarize(root, top))
}

fn summarize(root: &Path, top: Vec<Entry>) -> DirectorySummary {
    let mut summary = DirectorySummary::default();
    let mut pending = vec![top];

    while let Some(entries) = pending.pop() {
        for entry in entries {
            match entry.kind {
                EntryKind::Dir => {
                    if let Some(children) = read_subdirectory(&entry.path) {
                        if let Ok(rel) = entry.path.strip_prefix(root) {
                            summary.subdirectories.push(rel.to_path_buf());
                        }
                        pending.push(children);
                    }
                }
                EntryKind::File => summary.add_file(&entry.path),
                EntryKind::Other => {}
            }
        }
    }

    summary.subdirectories.sort();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("subject_02/rest.bdf"));
        touch(&dir.path().join("subject_01/focused_session.bdf"));
        touch(&dir.path().join("subject_01/sleepy_session.BDF"));
        touch(&dir.path().join("subject_01/notes.txt"));
        touch(&dir.path().join("top.bdf"));
        touch(&dir.path().join("README"));
        dir
    }

    #[test]
    fn test_recording_validation() {
        assert!(matches!(
            Recording::new(256.0, vec![], vec![]),
            Err(AnalysisError::EmptyRecording)
        ));
        assert!(matches!(
            Recording::new(256.0, vec![], vec![vec![0.0; 4], vec![0.0; 3]]),
            Err(AnalysisError::ChannelLengthMismatch { channel: 1, got: 3, expected: 4 })
        ));
        assert!(Recording::new(0.0, vec![], vec![vec![0.0; 4]]).is_err());
    }

    #[test]
    fn test_recording_fills_channel_names() {
        let rec = Recording::new(256.0, vec!["Fz".into()], vec![vec![0.0; 4]; 3]).unwrap();
        assert_eq!(rec.channel_names(), ["Fz", "Ch2", "Ch3"]);
    }

    #[test]
    fn test_recording_duration_and_slice() {
        let rec = Recording::new(4.0, vec![], vec![(0..9).map(f64::from).collect()]).unwrap();
        assert!((rec.duration_secs() - 2.0).abs() < 1e-12);

        let part = rec.slice(2, 5).unwrap();
        assert_eq!(part.channels()[0], vec![2.0, 3.0, 4.0]);

        let tail = rec.slice(7, 100).unwrap();
        assert_eq!(tail.n_samples(), 2);

        assert!(rec.slice(9, 20).is_err());
    }

    #[test]
    fn test_scanner_finds_sorted_recordings() {
        let dir = sample_tree();
        let scanner = DirectoryScanner::new(dir.path());

        let found: Vec<PathBuf> = scanner
            .recordings()
            .unwrap()
            .map(|id| id.path().strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("subject_01/focused_session.bdf"),
                PathBuf::from("subject_01/sleepy_session.BDF"),
                PathBuf::from("subject_02/rest.bdf"),
                PathBuf::from("top.bdf"),
            ]
        );
    }

    #[test]
    fn test_scanner_is_restartable() {
        let dir = sample_tree();
        let scanner = DirectoryScanner::new(dir.path());

        let first: Vec<_> = scanner.recordings().unwrap().collect();
        let second: Vec<_> = scanner.recordings().unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_scanner_missing_root_is_empty() {
        let scanner = DirectoryScanner::new("/nonexistent/eeg/data");
        assert_eq!(scanner.recordings().unwrap().count(), 0);
    }

    #[test]
    fn test_static_source() {
        let source = StaticSource::new([RecordingId::new("a.bdf"), RecordingId::new("b.bdf")]);
        let ids: Vec<_> = source.recordings().unwrap().collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1].to_string(), "b.bdf");
    }

    #[test]
    fn test_directory_summary() {
        let dir = sample_tree();
        let summary = directory_summary(dir.path()).unwrap();

        assert_eq!(summary.total_files, 6);
        assert_eq!(summary.recording_files, 4);
        assert_eq!(
            summary.subdirectories,
            vec![PathBuf::from("subject_01"), PathBuf::from("subject_02")]
        );
        assert_eq!(summary.files_by_extension.get("bdf"), Some(&4));
        assert_eq!(summary.files_by_extension.get("txt"), Some(&1));
        assert_eq!(summary.files_by_extension.get(""), Some(&1));
    }

    #[cfg(unix)]
    #[test]
    fn test_scanner_ignores_symlink_loop() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("s1/rec.bdf"));
        std::os::unix::fs::symlink(dir.path(), dir.path().join("s1/loop")).unwrap();

        let ids: Vec<_> = DirectoryScanner::new(dir.path()).recordings().unwrap().collect();
        assert_eq!(ids, vec![RecordingId::new(dir.path().join("s1/rec.bdf"))]);

        let summary = directory_summary(dir.path()).unwrap();
        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.recording_files, 1);
        assert_eq!(summary.subdirectories, vec![PathBuf::from("s1")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_recording_file_is_listed() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("data/a.bdf"));
        std::os::unix::fs::symlink(dir.path().join("data/a.bdf"), dir.path().join("link.bdf"))
            .unwrap();

        let ids: Vec<_> = DirectoryScanner::new(dir.path()).recordings().unwrap().collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(directory_summary(dir.path()).unwrap().recording_files, 2);
    }

    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("kept/a.bdf"));
        let entries = || {
            vec![
                Entry { path: dir.path().join("gone"), kind: EntryKind::Dir },
                Entry { path: dir.path().join("kept"), kind: EntryKind::Dir },
            ]
        };

        let walk = Walk { stack: vec![entries().into_iter()] };
        let ids: Vec<_> = walk.collect();
        assert_eq!(ids, vec![RecordingId::new(dir.path().join("kept/a.bdf"))]);

        let summary = summarize(dir.path(), entries());
        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.subdirectories, vec![PathBuf::from("kept")]);
    }

    #[test]
    fn test_directory_summary_missing_root_is_error() {
        let err = directory_summary(Path::new("/nonexistent/eeg/data")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
