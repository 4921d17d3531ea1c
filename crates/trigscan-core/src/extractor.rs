//! External fingerprint tool invocation.
//!
//! The descriptor algorithm lives in an external binary. Every call writes
//! its input to a random-suffixed scratch file, runs the tool, and parses the
//! JSON it prints on stdout.
//!
//! Tool contract:
//! - `<tool> extract <pcm_path> <sample_count>` reads raw little-endian
//!   signed 16-bit PCM and prints a descriptor
//!   (`{"data": [...], "size": n, "frameMetrics": {...}}`).
//! - `<tool> compare <probe_path> <reference_path>` reads two descriptor
//!   files and prints `{"score", "similarity", "frameStartTime",
//!   "mostSimilarFramePosition"}`.
//! - Exit code 0 on success; anything else is a tool failure.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, ScanError};
use crate::fingerprint::{Comparison, Fingerprint, Fingerprinter};
use crate::scratch::ScratchDir;

pub struct ExternalFingerprinter {
    tool_path: PathBuf,
    scratch: ScratchDir,
}

impl ExternalFingerprinter {
    /// Set up the tool wrapper. Creates the scan's scratch directory, which
    /// is fatal on failure.
    pub fn new(
        tool_path: impl Into<PathBuf>,
        root_dir: impl Into<PathBuf>,
        debug: bool,
    ) -> Result<Self> {
        Ok(Self {
            tool_path: tool_path.into(),
            scratch: ScratchDir::create(root_dir, debug)?,
        })
    }

    /// Run one tool subcommand and return its stdout.
    fn invoke(&self, subcommand: &str, args: &[&OsStr]) -> std::result::Result<Vec<u8>, String> {
        let output = Command::new(&self.tool_path)
            .arg(subcommand)
            .args(args)
            .output()
            .map_err(|err| format!("failed to run {}: {}", self.tool_path.display(), err))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} {} exited with {}: {}",
                self.tool_path.display(),
                subcommand,
                output.status,
                stderr.trim()
            ));
        }
        Ok(output.stdout)
    }

    fn keep_debug_copy(&self, stem: &str, stdout: &[u8]) {
        if let Some(path) = self.scratch.debug_path(stem, "json") {
            if let Err(err) = fs::write(&path, stdout) {
                log::debug!("failed to keep debug copy {}: {}", path.display(), err);
            }
        }
    }
}

impl Fingerprinter for ExternalFingerprinter {
    fn extract(&self, samples: &[i16]) -> Result<Fingerprint> {
        let pcm_path = self.scratch.next_path("window", "raw");
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        fs::write(&pcm_path, &bytes)?;
        let count = samples.len().to_string();
        let result = self.invoke("extract", &[pcm_path.as_os_str(), OsStr::new(&count)]);
        remove_scratch(&pcm_path);
        let stdout = result.map_err(ScanError::Extraction)?;
        self.keep_debug_copy("extract", &stdout);
        serde_json::from_slice(&stdout)
            .map_err(|err| ScanError::Extraction(format!("bad descriptor from tool: {}", err)))
    }

    fn compare(&self, probe: &Fingerprint, reference: &[u8]) -> Result<Comparison> {
        let probe_path = self.scratch.next_path("probe", "fp");
        let reference_path = self.scratch.next_path("reference", "fp");
        fs::write(&probe_path, &probe.data)?;
        let written = fs::write(&reference_path, reference);
        if let Err(err) = written {
            remove_scratch(&probe_path);
            return Err(ScanError::ScratchIo(err));
        }
        let result = self.invoke(
            "compare",
            &[probe_path.as_os_str(), reference_path.as_os_str()],
        );
        remove_scratch(&probe_path);
        remove_scratch(&reference_path);
        let stdout = result.map_err(ScanError::Comparison)?;
        self.keep_debug_copy("compare", &stdout);
        serde_json::from_slice(&stdout)
            .map_err(|err| ScanError::Comparison(format!("bad comparison from tool: {}", err)))
    }
}

fn remove_scratch(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        log::debug!("failed to remove scratch file {}: {}", path.display(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_an_extraction_error() {
        let root = std::env::temp_dir().join(format!("trigscan-extractor-{}", std::process::id()));
        let tool =
            ExternalFingerprinter::new("trigscan-no-such-tool", &root, false).unwrap();
        let err = tool.extract(&[0i16; 16]).unwrap_err();
        assert!(matches!(err, ScanError::Extraction(_)));
        let _ = fs::remove_dir_all(&root);
    }
}
