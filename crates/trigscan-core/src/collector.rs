//! Window collection: the ordered probe group for one scan offset.

use crate::error::Result;
use crate::fingerprint::{Comparison, Fingerprint, Fingerprinter};
use crate::stream::muldiv;

/// Probes per voting group.
pub const GROUP_SIZE: usize = 5;

/// One probed window: its position plus the extraction and comparison
/// results.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Window start relative to the stream, in milliseconds.
    pub offset_ms: i64,
    pub fingerprint: Fingerprint,
    pub comparison: Comparison,
}

/// Collect up to [`GROUP_SIZE`] probes at `elapse + i * delta`.
///
/// Each probe fingerprints the window `[offset, offset + window_ms)` and
/// compares it against the reference. A window that would run past the end of
/// the buffer ends the group early, as does a localized extraction or
/// comparison failure; the voter ignores short groups. Scratch I/O failures
/// abort the scan.
pub fn collect_window<F: Fingerprinter>(
    tool: &F,
    samples: &[i16],
    elapse_ms: i64,
    fingerprint_rate: i64,
    reference: &[u8],
    delta_ms: i64,
    window_ms: i64,
) -> Result<Vec<Probe>> {
    let mut probes = Vec::with_capacity(GROUP_SIZE);
    let mut offset_ms = elapse_ms;
    for _ in 0..GROUP_SIZE {
        let i_start = muldiv(offset_ms, fingerprint_rate, 1000) as usize;
        let i_end = muldiv(offset_ms + window_ms, fingerprint_rate, 1000) as usize;
        if i_end > samples.len() {
            break;
        }
        let window = &samples[i_start..i_end];
        let fingerprint = match tool.extract(window) {
            Ok(fingerprint) => fingerprint,
            Err(err) if err.is_localized() => {
                log::debug!("probe at {}ms skipped: {}", offset_ms, err);
                break;
            }
            Err(err) => return Err(err),
        };
        let comparison = match tool.compare(&fingerprint, reference) {
            Ok(comparison) => comparison,
            Err(err) if err.is_localized() => {
                log::debug!("probe at {}ms skipped: {}", offset_ms, err);
                break;
            }
            Err(err) => return Err(err),
        };
        probes.push(Probe {
            offset_ms,
            fingerprint,
            comparison,
        });
        offset_ms += delta_ms;
    }
    Ok(probes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ramp_buffer, MockFingerprinter};

    const RATE: i64 = 11025;

    #[test]
    fn collects_five_probes_at_delta_spacing() {
        let samples = ramp_buffer(10 * RATE as usize);
        let tool = MockFingerprinter::new(RATE, |_| -1.0);
        let group =
            collect_window(&tool, &samples, 2800, RATE, &[0u8; 4], 80, 1000).unwrap();
        assert_eq!(group.len(), GROUP_SIZE);
        let offsets: Vec<i64> = group.iter().map(|probe| probe.offset_ms).collect();
        assert_eq!(offsets, vec![2800, 2880, 2960, 3040, 3120]);
    }

    #[test]
    fn group_ends_early_at_buffer_end() {
        // 10 s buffer: the probe at 9240 ms needs samples up to 10240 ms.
        let samples = ramp_buffer(10 * RATE as usize);
        let tool = MockFingerprinter::new(RATE, |_| -1.0);
        let group =
            collect_window(&tool, &samples, 8900, RATE, &[0u8; 4], 80, 1000).unwrap();
        assert!(group.len() < GROUP_SIZE);
    }

    #[test]
    fn extraction_failure_truncates_the_group() {
        let samples = ramp_buffer(10 * RATE as usize);
        let mut tool = MockFingerprinter::new(RATE, |_| -1.0);
        tool.fail_extract_at.push(2960);
        let group =
            collect_window(&tool, &samples, 2800, RATE, &[0u8; 4], 80, 1000).unwrap();
        assert_eq!(group.len(), 2);
    }
}
