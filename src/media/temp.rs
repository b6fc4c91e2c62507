use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Context as _;

use crate::foundation::error::StoryResult;

/// Prefix carried by every temporary file this crate creates.
pub const TEMP_FILE_PREFIX: &str = "storyreel_";

/// Owns every temporary file created during one render.
///
/// Paths are registered before the file is created, so a failure at any later point still
/// leaves cleanup a way to find them. Cleanup runs on [`TempResourceTracker::cleanup`] and
/// again on drop, which covers early returns and unwinding.
#[derive(Debug)]
pub struct TempResourceTracker {
    dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl TempResourceTracker {
    /// Create a tracker that allocates files inside `dir`. Performs no I/O.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            paths: Vec::new(),
        }
    }

    /// Directory new artifacts are allocated in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve and register a unique path `storyreel_<label>_<random>.<extension>`.
    ///
    /// The file itself is not created.
    pub fn allocate(&mut self, label: &str, extension: &str) -> PathBuf {
        let name = format!(
            "{TEMP_FILE_PREFIX}{label}_{:016x}.{extension}",
            rand::random::<u64>()
        );
        let path = self.dir.join(name);
        self.paths.push(path.clone());
        path
    }

    /// Register an externally created path for cleanup.
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Paths currently tracked.
    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every tracked file. Returns the number of files that could not be removed.
    ///
    /// Files that were never created are skipped silently; other failures are logged.
    pub fn cleanup(&mut self) -> usize {
        let mut failures = 0;
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed temp file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    failures += 1;
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove temp file");
                }
            }
        }
        failures
    }
}

impl Drop for TempResourceTracker {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StoryResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Build `<dir>/<prefix>_<8 hex chars>.mp4`.
pub fn unique_output_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{prefix}_{:08x}.mp4", rand::random::<u32>()))
}

/// Remove crate temp files in `dir` older than `max_age`. Returns how many were removed.
///
/// Files without the crate prefix are left alone; per-file failures are logged and skipped.
pub fn sweep_stale_temp_files(dir: &Path, max_age: Duration) -> usize {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "temp sweep skipped");
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(TEMP_FILE_PREFIX));
        if !is_ours {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() {
            continue;
        }
        let age = meta
            .modified()
            .ok()
            .and_then(|m| now.duration_since(m).ok())
            .unwrap_or_default();
        if age <= max_age {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                removed += 1;
                tracing::info!(path = %path.display(), "removed stale temp file");
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove stale temp file"),
        }
    }
    removed
}

#[cfg(test)]
#[path = "../../tests/unit/media/temp.rs"]
mod tests;
