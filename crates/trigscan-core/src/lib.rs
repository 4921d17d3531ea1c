//! Trigscan Core - Trigger-Sound Detection Library
//!
//! Locates occurrences of a known trigger sound inside a PCM audio stream:
//! a fingerprint probe slides across the stream, groups of five neighboring
//! probes vote on whether a trigger is present, clustered candidates are
//! pruned, and the audio region following each surviving trigger is
//! fingerprinted as its payload.

pub mod audio;
pub mod collector;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fingerprint;
pub mod payload;
pub mod pruner;
pub mod scanner;
pub mod scratch;
pub mod stream;
pub mod tag;
pub mod voter;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use extractor::ExternalFingerprinter;
pub use fingerprint::{Comparison, Fingerprint, Fingerprinter, FrameMetrics};
pub use scanner::{CancelToken, TriggerScanner};
pub use stream::{muldiv, AudioStream, ReferenceFingerprint, ScanRequest};
pub use tag::{ScanResponse, TriggerTag};

/// Run a full trigger-sound scan over one audio stream.
pub fn scan_audio_stream<F: Fingerprinter>(
    tool: F,
    config: ScanConfig,
    request: &ScanRequest,
) -> Result<ScanResponse> {
    TriggerScanner::new(config, tool)?.scan(request)
}
