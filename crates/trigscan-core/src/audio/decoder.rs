//! Audio decoding to scan-ready PCM.

use anyhow::{Context, Result};
use std::path::Path;

use super::{resample_to_target, AudioFormat};

/// Mono 16-bit PCM at the fingerprint rate, ready to scan.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub duration_ms: u32,
}

/// Decode an audio file to mono i16 at `target_sample_rate`.
///
/// Raw input is assumed to already be mono s16le at the target rate.
pub fn decode_audio(path: &str, target_sample_rate: u32) -> Result<DecodedAudio> {
    let path = Path::new(path);
    if !path.exists() {
        anyhow::bail!("Audio file not found: {}", path.display());
    }

    let (samples, sample_rate) = match AudioFormat::from_path(path) {
        AudioFormat::Wav => decode_wav(path)?,
        AudioFormat::Mp3 => decode_mp3(path)?,
        AudioFormat::RawPcm => (decode_raw(path)?, target_sample_rate),
        AudioFormat::Unknown => {
            anyhow::bail!("Unsupported audio format: {}", path.display());
        }
    };

    let samples = if sample_rate != target_sample_rate {
        resample_to_target(&samples, sample_rate, target_sample_rate)
    } else {
        samples
    };

    let pcm: Vec<i16> = samples
        .iter()
        .map(|&value| (value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    let duration_ms =
        (pcm.len() as f64 / target_sample_rate as f64 * 1000.0) as u32;

    Ok(DecodedAudio {
        samples: pcm,
        sample_rate: target_sample_rate,
        duration_ms,
    })
}

/// Average interleaved channels down to mono.
fn to_mono(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Decode a WAV file to mono f32.
fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => {
            reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?
        }
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok((to_mono(samples, spec.channels), spec.sample_rate))
}

/// Decode an MP3 file to mono f32.
fn decode_mp3(path: &Path) -> Result<(Vec<f32>, u32)> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read MP3 file: {}", path.display()))?;

    let mut decoder = minimp3::Decoder::new(&data[..]);
    let mut samples = Vec::new();
    let mut sample_rate = 0;
    let mut channels = 0;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if sample_rate == 0 {
                    sample_rate = frame.sample_rate as u32;
                    channels = frame.channels as u16;
                }
                for &sample in &frame.data {
                    samples.push(sample as f32 / 32768.0);
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(err) => anyhow::bail!("MP3 decode error: {}", err),
        }
    }
    if sample_rate == 0 {
        anyhow::bail!("No audio frames in MP3 file: {}", path.display());
    }

    Ok((to_mono(samples, channels), sample_rate))
}

/// Read headerless little-endian s16 PCM as mono f32.
fn decode_raw(path: &Path) -> Result<Vec<f32>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read PCM file: {}", path.display()))?;
    let samples = data
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]) as f32 / 32768.0)
        .collect();
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_averaging_halves_stereo() {
        let stereo = vec![0.0, 1.0, 0.5, 0.5, -1.0, 1.0];
        let mono = to_mono(stereo, 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn raw_pcm_round_trips_through_decode() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("trigscan-decode-{}.raw", std::process::id()));
        let samples: Vec<i16> = vec![0, 16384, -16384, 32767];
        let mut bytes = Vec::new();
        for sample in &samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        std::fs::write(&path, &bytes).unwrap();

        let decoded = decode_audio(path.to_str().unwrap(), 11025).unwrap();
        assert_eq!(decoded.sample_rate, 11025);
        assert_eq!(decoded.samples.len(), samples.len());
        assert_eq!(decoded.samples[0], 0);
        assert!((decoded.samples[1] - 16383).abs() <= 1);

        let _ = std::fs::remove_file(&path);
    }
}
