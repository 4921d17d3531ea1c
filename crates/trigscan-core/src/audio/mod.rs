//! Audio input handling for the scan front end.
//!
//! Decodes WAV, MP3, or headerless s16le PCM into the mono 16-bit buffer the
//! scan engine consumes, resampled to the fingerprint rate.

mod decoder;
mod resample;

pub use decoder::{decode_audio, DecodedAudio};
pub use resample::resample_to_target;

use std::path::Path;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    /// Headerless little-endian signed 16-bit PCM.
    RawPcm,
    Unknown,
}

impl AudioFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("wav") | Some("wave") => AudioFormat::Wav,
            Some("mp3") => AudioFormat::Mp3,
            Some("raw") | Some("pcm") => AudioFormat::RawPcm,
            _ => AudioFormat::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats_by_extension() {
        assert_eq!(AudioFormat::from_path(Path::new("a.wav")), AudioFormat::Wav);
        assert_eq!(AudioFormat::from_path(Path::new("a.mp3")), AudioFormat::Mp3);
        assert_eq!(
            AudioFormat::from_path(Path::new("a.pcm")),
            AudioFormat::RawPcm
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("a.flac")),
            AudioFormat::Unknown
        );
    }
}
