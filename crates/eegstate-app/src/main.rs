//! EEG State Application
//!
//! Command-line entry point for the EEG attention analyzer.
//!
//! # Usage
//!
//! ```bash
//! # Classify a set of band powers
//! eegstate classify --delta 2.1 --theta 3.4 --alpha 9.8 --beta 4.0 --gamma 0.7
//!
//! # List recordings below a directory
//! eegstate scan ./data --summary
//!
//! # Replay a synthetic beta-dominant recording in 3 s chunks
//! eegstate simulate --dominant beta --duration 60
//!
//! # Use a TOML config file
//! eegstate --config eegstate.toml simulate
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use eegstate_core::{AttentionState, BandPowers, EegBand, StateClassifier};
use eegstate_native::{
    analyze_recording, directory_summary, generate, AnalysisConfig, ChunkedAnalyzer,
    DirectoryScanner, HistoryEntry, MonitorSession, RecordingId, StaticSource, SyntheticConfig,
};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// EEG State Application
#[derive(Parser, Debug)]
#[command(name = "eegstate")]
#[command(author, version, about = "EEG band power attention-state analyzer", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// TOML analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify one set of band powers
    Classify {
        /// Delta power (0.5-4 Hz)
        #[arg(long)]
        delta: f64,

        /// Theta power (4-8 Hz)
        #[arg(long)]
        theta: f64,

        /// Alpha power (8-13 Hz)
        #[arg(long)]
        alpha: f64,

        /// Beta power (13-30 Hz)
        #[arg(long)]
        beta: f64,

        /// Gamma power (30-45 Hz)
        #[arg(long)]
        gamma: f64,

        /// Tie tolerance; overrides the config file
        #[arg(short, long)]
        epsilon: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List recordings below a directory
    Scan {
        /// Directory to search
        dir: PathBuf,

        /// Also print file counts by extension
        #[arg(long)]
        summary: bool,
    },

    /// Replay a synthetic recording chunk by chunk
    Simulate {
        /// Band to make dominant: delta, theta, alpha, beta or gamma
        #[arg(short, long, default_value = "alpha", value_parser = parse_band)]
        dominant: EegBand,

        /// Number of channels
        #[arg(long, default_value = "32")]
        channels: usize,

        /// Recording length in seconds
        #[arg(long, default_value = "60")]
        duration: f64,

        /// RNG seed
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Chunk step in seconds; overrides the config file
        #[arg(long)]
        chunk: Option<f64>,

        /// Analysis window in seconds; overrides the config file
        #[arg(long)]
        window: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn parse_band(s: &str) -> Result<EegBand, String> {
    EegBand::from_name(s).ok_or_else(|| format!("unknown band '{s}'"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("EEG State v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { delta, theta, alpha, beta, gamma, epsilon, json } => {
            let powers = BandPowers::new(delta, theta, alpha, beta, gamma);
            run_classify(config, powers, epsilon, json)?;
        }
        Commands::Scan { dir, summary } => {
            run_scan(config, &dir, summary)?;
        }
        Commands::Simulate { dominant, channels, duration, seed, chunk, window, json } => {
            let synthetic = SyntheticConfig {
                n_channels: channels,
                duration_secs: duration,
                dominant,
                seed,
                ..SyntheticConfig::default()
            };
            run_simulate(config, &synthetic, chunk, window, json)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

#[derive(Serialize)]
struct ClassifyOutput {
    #[serde(flatten)]
    result: eegstate_core::ClassificationResult,
    ratios: eegstate_core::BandRatios,
    relative: BandPowers,
}

/// Classify a single set of band powers
fn run_classify(
    mut config: AnalysisConfig,
    powers: BandPowers,
    epsilon: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(epsilon) = epsilon {
        config.classifier.epsilon = epsilon;
    }

    let classifier = StateClassifier::new(config.classifier)?;
    let result = classifier.classify(powers)?;

    if json {
        let output = ClassifyOutput { result, ratios: powers.ratios(), relative: powers.relative() };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Dominant band: {}", result.dominant);
    println!("State:         {}", result.state);
    println!("               {}", result.state.description());
    print_ratios(&powers);

    Ok(())
}

/// List recordings below `dir`
fn run_scan(config: AnalysisConfig, dir: &Path, summary: bool) -> anyhow::Result<()> {
    let session = MonitorSession::new(config, DirectoryScanner::new(dir))?;

    for id in session.scan()? {
        println!("{id}");
    }

    if summary {
        let summary = directory_summary(dir)?;
        println!();
        println!("Files:       {}", summary.total_files);
        println!("Recordings:  {}", summary.recording_files);
        println!("Directories: {}", summary.subdirectories.len());
        for (ext, count) in &summary.files_by_extension {
            let ext = if ext.is_empty() { "(none)" } else { ext.as_str() };
            println!("  {ext:<10} {count}");
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct SimulateOutput<'a> {
    history: Vec<&'a HistoryEntry>,
    state_counts: BTreeMap<String, usize>,
    overall: eegstate_core::ClassificationResult,
}

/// Generate a synthetic recording and replay it chunk by chunk
fn run_simulate(
    mut config: AnalysisConfig,
    synthetic: &SyntheticConfig,
    chunk: Option<f64>,
    window: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(chunk) = chunk {
        config.streaming.chunk_secs = chunk;
    }
    if let Some(window) = window {
        config.streaming.window_secs = window;
    }
    config.validate()?;

    let recording = generate(synthetic)?;
    let id = RecordingId::new(format!("synthetic-{}-{}.bdf", synthetic.dominant, synthetic.seed));

    let mut session = MonitorSession::new(config, StaticSource::new([id.clone()]))?;
    session.select(id)?;

    let mut analyzer = ChunkedAnalyzer::new(&recording, &config)?;
    info!(
        "Replaying {:.1}s of synthetic {} data",
        analyzer.total_duration(),
        synthetic.dominant
    );

    while let Some(chunk) = analyzer.next_chunk()? {
        session.record(HistoryEntry::new(chunk.end_secs, &chunk.classification));

        if !json {
            println!(
                "[{:>6.1}s] {:<6} {:<15} ({:>3.0}%)",
                chunk.end_secs,
                chunk.classification.dominant.name(),
                chunk.classification.state.label(),
                analyzer.progress() * 100.0
            );
        }
    }

    let overall = analyze_recording(&recording, &config)?;

    let mut state_counts = BTreeMap::new();
    for entry in session.history() {
        *state_counts.entry(entry.state.label().to_string()).or_insert(0) += 1;
    }

    if json {
        let output = SimulateOutput {
            history: session.history().collect(),
            state_counts,
            overall: overall.classification,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("History ({} windows):", session.history().len());
    for state in AttentionState::ALL {
        let count = state_counts.get(state.label()).copied().unwrap_or(0);
        println!("  {:<15} {count}", state.label());
    }
    if let Some(latest) = session.latest_state() {
        println!("Latest state:  {latest}");
    }
    println!(
        "Whole recording: {} dominant, {}",
        overall.classification.dominant, overall.classification.state
    );
    print_ratios(&overall.band_powers);

    Ok(())
}

fn print_ratios(powers: &BandPowers) {
    let ratios = powers.ratios();
    let fmt = |r: Option<f64>| r.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
    println!("Alpha/Beta:  {}", fmt(ratios.alpha_beta));
    println!("Theta/Beta:  {}", fmt(ratios.theta_beta));
    println!("Delta/Alpha: {}", fmt(ratios.delta_alpha));
}
