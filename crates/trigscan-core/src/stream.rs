//! Scan inputs and time/sample-index conversion.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Shortest stream the scanner accepts, in seconds.
pub const MIN_DURATION_SECS: u32 = 6;
/// Longest stream the scanner accepts, in seconds.
pub const MAX_DURATION_SECS: u32 = 17;

/// 64-bit `a * b / c` with truncation.
///
/// Sample-index math relies on the truncation semantics; do not round.
pub fn muldiv(a: i64, b: i64, c: i64) -> i64 {
    a * b / c
}

/// A fully materialized mono PCM buffer under scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStream {
    /// Signed 16-bit PCM samples.
    pub data: Vec<i16>,
    /// Declared sample count; must equal `data.len()`.
    pub size: u32,
    /// Sample rate of the source audio (Hz).
    pub sample_rate: u32,
    /// Stream length in whole seconds.
    pub duration: u32,
    /// Rate at which fingerprint frame offsets are measured (Hz).
    pub fingerprint_rate: u32,
}

impl AudioStream {
    pub fn validate(&self) -> Result<()> {
        if self.data.len() != self.size as usize {
            return Err(ScanError::InvalidInput(format!(
                "sample buffer holds {} samples but size says {}",
                self.data.len(),
                self.size
            )));
        }
        if self.duration < MIN_DURATION_SECS || self.duration > MAX_DURATION_SECS {
            return Err(ScanError::InvalidInput(format!(
                "duration must be {} to {} seconds only, got {}",
                MIN_DURATION_SECS, MAX_DURATION_SECS, self.duration
            )));
        }
        if self.sample_rate == 0 {
            return Err(ScanError::InvalidInput("sample rate must be > 0".into()));
        }
        if self.fingerprint_rate == 0 {
            return Err(ScanError::InvalidInput("fingerprint rate must be > 0".into()));
        }
        Ok(())
    }
}

/// Opaque binary descriptor of the trigger sound being searched for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceFingerprint {
    pub data: Vec<u8>,
    /// Declared byte length; must equal `data.len()`.
    pub size: u32,
}

impl ReferenceFingerprint {
    pub fn validate(&self) -> Result<()> {
        if self.data.len() != self.size as usize {
            return Err(ScanError::InvalidInput(format!(
                "reference fingerprint holds {} bytes but size says {}",
                self.data.len(),
                self.size
            )));
        }
        Ok(())
    }
}

/// Everything one scan consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Absolute stream offset corresponding to sample index 0, in
    /// milliseconds. Only used to produce absolute tag positions.
    pub data_offset: i64,
    pub stream: AudioStream,
    pub reference: ReferenceFingerprint,
}

impl ScanRequest {
    pub fn validate(&self) -> Result<()> {
        if self.data_offset < 0 {
            return Err(ScanError::InvalidInput(format!(
                "data offset must be >= 0, got {}",
                self.data_offset
            )));
        }
        self.stream.validate()?;
        self.reference.validate()?;
        Ok(())
    }
}
