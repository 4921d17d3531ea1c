//! Trigger tags and the scan response shape.

use serde::{Deserialize, Serialize};

use crate::fingerprint::Comparison;

/// A located occurrence of the trigger sound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerTag {
    /// Absolute stream position of the trigger, in milliseconds.
    pub data_position: i64,
    pub most_similar_frame_position: i32,
    pub score: f64,
    pub similarity: f64,
    /// Printable payload fingerprint of the region following the trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TriggerTag {
    /// Build a candidate from the probe the voter selected.
    pub fn from_hit(data_offset: i64, probe_offset_ms: i64, comparison: &Comparison) -> Self {
        Self {
            data_position: data_offset + probe_offset_ms,
            most_similar_frame_position: comparison.most_similar_frame_position,
            score: comparison.score,
            similarity: comparison.similarity,
            description: None,
        }
    }
}

/// Final result of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    /// Number of accepted trigger tags.
    pub trigger_counts: u64,
    /// Mirrors `live_tags.len()`; kept as a distinct response field.
    pub tag_counts: u64,
    pub live_tags: Vec<TriggerTag>,
}

impl ScanResponse {
    pub fn from_tags(live_tags: Vec<TriggerTag>) -> Self {
        let count = live_tags.len() as u64;
        Self {
            trigger_counts: count,
            tag_counts: count,
            live_tags,
        }
    }
}
