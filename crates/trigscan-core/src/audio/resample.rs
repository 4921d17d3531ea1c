//! Linear-interpolation resampling.

/// Resample mono audio to `to_rate` using linear interpolation.
///
/// Output sample `i` is read at source position `i * from_rate / to_rate`,
/// blending the two surrounding input samples. Positions past the end clamp
/// to the last input sample.
pub fn resample_to_target(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let out_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64).ceil() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let base = (pos as usize).min(last);
            let next = (base + 1).min(last);
            let t = (pos - base as f64) as f32;
            samples[base] + (samples[next] - samples[base]) * t
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_a_copy() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_to_target(&samples, 11025, 11025), samples);
    }

    #[test]
    fn downsampling_halves_the_length() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let resampled = resample_to_target(&samples, 22050, 11025);
        assert!((resampled.len() as i64 - 500).abs() <= 1);
    }

    #[test]
    fn interpolates_between_neighbors() {
        let samples = vec![0.0, 1.0];
        let resampled = resample_to_target(&samples, 100, 200);
        assert!((resampled[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tail_clamps_to_the_last_sample() {
        let samples = vec![0.0, 1.0];
        let resampled = resample_to_target(&samples, 100, 200);
        assert_eq!(resampled.last().copied(), Some(1.0));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(resample_to_target(&[], 22050, 11025).is_empty());
    }
}
