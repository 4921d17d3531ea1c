//! Deterministic fingerprint tooling for tests.

use std::sync::Mutex;

use crate::error::{Result, ScanError};
use crate::fingerprint::{Comparison, Fingerprint, Fingerprinter, FrameMetrics};
use crate::collector::Probe;
use crate::stream::muldiv;

/// Sample buffer whose values encode their own position: sample `i` holds
/// `i / 8`. Any window sliced out of it reveals its start index, which lets
/// the mock tool key its answers by window position.
pub fn ramp_buffer(len: usize) -> Vec<i16> {
    (0..len).map(|i| (i / 8) as i16).collect()
}

/// Recover the exact start index of a window sliced out of [`ramp_buffer`].
pub fn window_start(samples: &[i16]) -> usize {
    let base = samples[0] as usize * 8;
    match samples.iter().position(|&sample| sample != samples[0]) {
        Some(step) => base + (8 - step) % 8,
        None => base,
    }
}

/// Build a voter-input probe with the given window position and frame start
/// time.
pub fn probe_with_frame_start_time(offset_ms: i64, frame_start_time: f64) -> Probe {
    Probe {
        offset_ms,
        fingerprint: Fingerprint {
            data: Vec::new(),
            size: 0,
            frame_metrics: FrameMetrics::default(),
        },
        comparison: Comparison {
            score: 40.0,
            similarity: 0.9,
            frame_start_time,
            most_similar_frame_position: offset_ms as i32,
        },
    }
}

type SignFn = Box<dyn Fn(i64) -> f64 + Send + Sync>;

/// Mock fingerprint tool.
///
/// The sign function assigns each probe window a `frame_start_time` by the
/// window's start position in milliseconds. Descriptors encode the window
/// start index, so payload strings are predictable.
pub struct MockFingerprinter {
    fingerprint_rate: i64,
    sign_of: SignFn,
    /// Window start positions (ms) whose extraction fails.
    pub fail_extract_at: Vec<i64>,
    /// Window start positions (ms) observed by `extract`, in call order.
    pub extract_calls: Mutex<Vec<i64>>,
}

impl MockFingerprinter {
    pub fn new(
        fingerprint_rate: i64,
        sign_of: impl Fn(i64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            fingerprint_rate,
            sign_of: Box::new(sign_of),
            fail_extract_at: Vec::new(),
            extract_calls: Mutex::new(Vec::new()),
        }
    }
}

impl Fingerprinter for MockFingerprinter {
    fn extract(&self, samples: &[i16]) -> Result<Fingerprint> {
        let start = window_start(samples);
        let start_ms = muldiv(start as i64, 1000, self.fingerprint_rate);
        self.extract_calls.lock().unwrap().push(start_ms);
        if self.fail_extract_at.contains(&start_ms) {
            return Err(ScanError::Extraction(format!(
                "injected failure at {}ms",
                start_ms
            )));
        }
        let data = (start as u64).to_le_bytes().to_vec();
        Ok(Fingerprint {
            size: data.len(),
            data,
            frame_metrics: FrameMetrics::default(),
        })
    }

    fn compare(&self, probe: &Fingerprint, _reference: &[u8]) -> Result<Comparison> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&probe.data);
        let start = u64::from_le_bytes(raw) as i64;
        let start_ms = muldiv(start, 1000, self.fingerprint_rate);
        Ok(Comparison {
            score: 40.0,
            similarity: 0.9,
            frame_start_time: (self.sign_of)(start_ms),
            most_similar_frame_position: start_ms as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_start_recovers_any_alignment() {
        let buffer = ramp_buffer(1024);
        for start in [0usize, 1, 7, 8, 42, 511, 777] {
            assert_eq!(window_start(&buffer[start..start + 64]), start);
        }
    }
}
