//! Per-scan scratch space with randomized file names.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;

/// Scratch directory owned by a single scan.
///
/// File names carry a random suffix so parallel probes never collide. The RNG
/// is seeded with wall-clock time at scan start and disambiguates file names
/// only; nothing else in the scan draws from it.
pub struct ScratchDir {
    root: PathBuf,
    debug_dir: Option<PathBuf>,
    rng: Mutex<StdRng>,
}

impl ScratchDir {
    /// Create the scratch root, and `debug/` beneath it when requested.
    /// Failure here is fatal to the scan.
    pub fn create(root: impl Into<PathBuf>, debug: bool) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let debug_dir = if debug {
            let dir = root.join("debug");
            fs::create_dir_all(&dir)?;
            Some(dir)
        } else {
            None
        };
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        Ok(Self {
            root,
            debug_dir,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    /// Path for a fresh scratch file.
    pub fn next_path(&self, stem: &str, ext: &str) -> PathBuf {
        self.root.join(format!("{}-{:016x}.{}", stem, self.next_suffix(), ext))
    }

    /// Path for a debug artifact, when debug retention is enabled.
    pub fn debug_path(&self, stem: &str, ext: &str) -> Option<PathBuf> {
        let dir = self.debug_dir.as_deref()?;
        Some(dir.join(format!("{}-{:016x}.{}", stem, self.next_suffix(), ext)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn next_suffix(&self) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen()
    }
}
