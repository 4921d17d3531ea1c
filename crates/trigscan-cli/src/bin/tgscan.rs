//! tgscan - Trigger-sound scanner
//!
//! Usage: tgscan <audio_path> <fingerprint_path>

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use trigscan_cli::output::print_json_response;
use trigscan_core::{
    audio::decode_audio, AudioStream, ExternalFingerprinter, ReferenceFingerprint, ScanConfig,
    ScanRequest, TriggerScanner,
};

#[derive(Parser, Debug)]
#[command(name = "tgscan")]
#[command(about = "Find trigger sounds in an audio stream", long_about = None)]
struct Args {
    /// Input audio file (.wav, .mp3, .raw/.pcm)
    audio_path: String,

    /// Reference trigger-sound fingerprint (raw descriptor bytes)
    fingerprint_path: String,

    /// Absolute stream offset of the buffer start, in milliseconds
    #[arg(short, long, default_value_t = 0)]
    offset: i64,

    /// Fingerprint rate in Hz
    #[arg(short, long, default_value_t = 11025)]
    rate: u32,

    /// Stream duration in seconds (defaults to the decoded length)
    #[arg(short, long)]
    duration: Option<u32>,

    /// External fingerprint tool
    #[arg(long, default_value = "fingerprint-tool")]
    tool: String,

    /// Scratch directory for tool I/O
    #[arg(long, default_value = "scratch")]
    scratch_dir: String,

    /// Worker threads for window collection
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Trace the scan and keep per-probe tool output
    #[arg(long)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    // Default: no logs (clean JSON output for parsing)
    // Verbose: Info, debug: full scan tracing
    let level = if args.debug {
        log::LevelFilter::Debug
    } else if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Off
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    run_tgscan(&args)?;

    Ok(())
}

fn run_tgscan(args: &Args) -> Result<()> {
    let audio_path = Path::new(&args.audio_path);
    let fingerprint_path = Path::new(&args.fingerprint_path);

    if !fingerprint_path.exists() {
        anyhow::bail!("Fingerprint file not found: {}", fingerprint_path.display());
    }

    // Each scan gets its own scratch subdirectory named after the input.
    let session = audio_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    if session.is_empty() {
        anyhow::bail!(
            "Cannot derive a scratch session name from: {}",
            audio_path.display()
        );
    }

    let reference = std::fs::read(fingerprint_path).with_context(|| {
        format!(
            "Failed to read fingerprint file: {}",
            fingerprint_path.display()
        )
    })?;
    if reference.is_empty() {
        anyhow::bail!("Reference fingerprint is empty");
    }

    let start = std::time::Instant::now();
    let decoded = decode_audio(&args.audio_path, args.rate)?;
    log::info!(
        "Decoded audio: {:.1}s duration, {} samples @ {}Hz",
        decoded.duration_ms as f64 / 1000.0,
        decoded.samples.len(),
        decoded.sample_rate
    );

    let duration = args
        .duration
        .unwrap_or_else(|| ((decoded.duration_ms as f64) / 1000.0).round() as u32);

    let request = ScanRequest {
        data_offset: args.offset,
        stream: AudioStream {
            size: decoded.samples.len() as u32,
            data: decoded.samples,
            sample_rate: decoded.sample_rate,
            duration,
            fingerprint_rate: args.rate,
        },
        reference: ReferenceFingerprint {
            size: reference.len() as u32,
            data: reference,
        },
    };

    let config = ScanConfig {
        workers: args.workers,
        debug: args.debug,
        ..ScanConfig::default()
    };
    let root_dir = Path::new(&args.scratch_dir).join(session);
    let tool = ExternalFingerprinter::new(&args.tool, root_dir, args.debug)?;
    let scanner = TriggerScanner::new(config, tool)?;

    let response = scanner.scan(&request)?;
    log::info!(
        "Found {} trigger tags in {:.2}s",
        response.tag_counts,
        start.elapsed().as_secs_f64()
    );

    print_json_response(&response);

    Ok(())
}
