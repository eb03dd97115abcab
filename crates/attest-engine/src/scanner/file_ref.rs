//! FileRef builder: one file's size, modified time, and content checksum.

use std::fs;
use std::path::Path;

use attest_core::types::state::{Degradation, EvidenceLocation, FileRef};
use attest_core::EngineConfig;
use chrono::{DateTime, Utc};
use xxhash_rust::xxh3::xxh3_64;

/// Build a [`FileRef`] for one content file.
///
/// A failed content read degrades the checksum to `None` (recorded in
/// `degraded`) but still yields a ref from the stat facts; a failed stat
/// yields no ref at all.
pub fn build_file_ref(
    path: &Path,
    location: EvidenceLocation,
    config: &EngineConfig,
    degraded: &mut Vec<Degradation>,
) -> Option<FileRef> {
    let filename = path.file_name()?.to_string_lossy().into_owned();

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            degraded.push(Degradation {
                location: filename,
                reason: format!("stat failed: {e}"),
            });
            return None;
        }
    };

    let modified_at: DateTime<Utc> = meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let checksum = if config.effective_compute_checksums()
        && meta.len() <= config.effective_max_checksum_file_size()
    {
        match fs::read(path) {
            Ok(content) => Some(format!("xxh3:{:016x}", xxh3_64(&content))),
            Err(e) => {
                degraded.push(Degradation {
                    location: filename.clone(),
                    reason: format!("checksum read failed: {e}"),
                });
                None
            }
        }
    } else {
        None
    };

    Some(FileRef {
        filename,
        size_bytes: meta.len(),
        checksum,
        modified_at,
        location,
    })
}
