//! Scan configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Tunable parameters of the scan sweep.
///
/// Defaults reproduce the production detector: a 100 ms sweep stride, 80 ms
/// between the five probes of a voting group, one-second probe windows, and
/// a 500 ms pruning radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Sweep stride between voting groups (ms).
    pub stride_ms: i64,
    /// Spacing between the five probes of a group (ms).
    pub probe_delta_ms: i64,
    /// Probe window length (ms).
    pub window_ms: i64,
    /// Cluster radius used when pruning candidate tags (ms).
    pub prune_radius_ms: i64,
    /// Worker threads for window collection; 1 scans sequentially.
    pub workers: usize,
    /// Trace the scan and retain per-probe tool output.
    pub debug: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            stride_ms: 100,
            probe_delta_ms: 80,
            window_ms: 1000,
            prune_radius_ms: 500,
            workers: 1,
            debug: false,
        }
    }
}

impl ScanConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.stride_ms <= 0 {
            return Err(ScanError::InvalidInput("stride_ms must be > 0".into()));
        }
        if self.probe_delta_ms <= 0 {
            return Err(ScanError::InvalidInput("probe_delta_ms must be > 0".into()));
        }
        if self.window_ms <= 0 {
            return Err(ScanError::InvalidInput("window_ms must be > 0".into()));
        }
        if self.prune_radius_ms < 0 {
            return Err(ScanError::InvalidInput("prune_radius_ms must be >= 0".into()));
        }
        if self.workers == 0 {
            return Err(ScanError::InvalidInput("workers must be >= 1".into()));
        }
        Ok(())
    }
}
