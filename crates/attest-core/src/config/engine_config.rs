//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration shared by the scanner, evaluator, and cleanup subsystems.
///
/// Passed explicitly into each constructor; there is no ambient config
/// singleton.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Root of the evidence tree (one task directory per task).
    pub evidence_dir: PathBuf,
    /// Worker threads for fleet-wide scans. 0 = use the global pool.
    pub threads: Option<usize>,
    /// Compute content checksums while building file refs. Default: true.
    pub compute_checksums: Option<bool>,
    /// Files larger than this are not checksummed. Default: 64MB.
    pub max_checksum_file_size: Option<u64>,
}

impl EngineConfig {
    pub fn new(evidence_dir: impl Into<PathBuf>) -> Self {
        Self {
            evidence_dir: evidence_dir.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(std::io::Error::other)
    }

    /// Returns the effective thread count, defaulting to 0 (global pool).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns whether checksums are computed, defaulting to true.
    pub fn effective_compute_checksums(&self) -> bool {
        self.compute_checksums.unwrap_or(true)
    }

    /// Returns the checksum size cap, defaulting to 64MB.
    pub fn effective_max_checksum_file_size(&self) -> u64 {
        self.max_checksum_file_size.unwrap_or(64 * 1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::new("/tmp/evidence");
        assert_eq!(cfg.effective_threads(), 0);
        assert!(cfg.effective_compute_checksums());
        assert_eq!(cfg.effective_max_checksum_file_size(), 64 * 1024 * 1024);
    }

    #[test]
    fn load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attest.toml");
        std::fs::write(&path, "evidence_dir = \"data/evidence\"\nthreads = 4\n").unwrap();
        let cfg = EngineConfig::load(&path).unwrap();
        assert_eq!(cfg.evidence_dir, PathBuf::from("data/evidence"));
        assert_eq!(cfg.effective_threads(), 4);
    }
}
