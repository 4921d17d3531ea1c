//! Fingerprint descriptors and the capability surface of the external tool.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Frame-level metrics the extractor reports alongside a descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetrics {
    /// Number of analysis frames the descriptor covers.
    pub frame_count: u32,
    /// Frame with the highest energy.
    pub dominant_frame: i32,
    /// Mean frame energy.
    pub mean_energy: f64,
}

/// Opaque binary descriptor of an audio window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub data: Vec<u8>,
    pub size: usize,
    #[serde(default)]
    pub frame_metrics: FrameMetrics,
}

/// Similarity record for one probe window measured against the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub score: f64,
    pub similarity: f64,
    /// Signed frame start time. Its polarity is the sole signal the pattern
    /// voter consumes.
    pub frame_start_time: f64,
    pub most_similar_frame_position: i32,
}

/// Capability surface of the fingerprint tool.
///
/// Production code shells out to the external binary; tests substitute
/// deterministic implementations.
pub trait Fingerprinter: Send + Sync {
    /// Produce a descriptor for a window of PCM samples.
    fn extract(&self, samples: &[i16]) -> Result<Fingerprint>;

    /// Compare a probe descriptor against the reference descriptor bytes.
    fn compare(&self, probe: &Fingerprint, reference: &[u8]) -> Result<Comparison>;
}

/// Render descriptor bytes as the printable payload form carried by tags:
/// decimal byte values joined with commas.
pub fn fingerprint_to_string(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 4);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&byte.to_string());
    }
    out
}
