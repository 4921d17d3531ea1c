//! Post-trigger payload extraction.
//!
//! The payload is a fingerprint of the five-second region starting one
//! second after the detected trigger position; its printable form becomes
//! the tag's description.

use crate::error::Result;
use crate::fingerprint::{fingerprint_to_string, Fingerprinter};
use crate::stream::muldiv;
use crate::tag::TriggerTag;

/// Gap between a trigger position and the start of its payload region (ms).
pub const PAYLOAD_LEAD_MS: i64 = 1000;
/// Length of the payload region (ms).
pub const PAYLOAD_LENGTH_MS: i64 = 5000;

/// Fingerprint the payload region after `tag` and attach it as the tag's
/// description.
///
/// Tags whose payload region does not fit inside the buffer are dropped
/// (`Ok(None)`), as are tags whose payload extraction fails locally.
pub fn attach_payload<F: Fingerprinter>(
    tool: &F,
    samples: &[i16],
    fingerprint_rate: i64,
    data_offset: i64,
    max_duration_ms: i64,
    mut tag: TriggerTag,
) -> Result<Option<TriggerTag>> {
    let mut tag_offset = tag.data_position + PAYLOAD_LEAD_MS;
    let mut end_offset = tag_offset + PAYLOAD_LENGTH_MS;
    if end_offset >= data_offset + max_duration_ms {
        return Ok(None);
    }
    tag_offset -= data_offset;
    end_offset -= data_offset;
    let i_start = muldiv(tag_offset, fingerprint_rate, 1000);
    let i_end = muldiv(end_offset, fingerprint_rate, 1000);
    let size = i_end - i_start;
    if size <= 0 || size as usize >= samples.len() {
        return Ok(None);
    }
    if i_start < 0 || i_end as usize > samples.len() {
        return Ok(None);
    }
    let window = &samples[i_start as usize..i_end as usize];
    match tool.extract(window) {
        Ok(fingerprint) => {
            tag.description = Some(fingerprint_to_string(&fingerprint.data));
            Ok(Some(tag))
        }
        Err(err) if err.is_localized() => {
            log::debug!(
                "payload extraction for tag at {}ms failed: {}",
                tag.data_position,
                err
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
