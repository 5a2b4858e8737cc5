//! Where the CLI keeps its files.
//!
//! Resolved through the platform conventions: XDG on Linux, the standard
//! locations on macOS and Windows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept besides the current one.
const KEEP_LOGS: usize = 25;

/// Resolved data and cache directories.
#[derive(Debug, Clone)]
pub struct AppPaths {
    data: PathBuf,
    cache: PathBuf,
}

impl AppPaths {
    /// Resolves the directories, or `None` when there is no home directory.
    pub fn resolve() -> Option<Self> {
        let dirs = ProjectDirs::from("dev", "mcse", "effects")?;
        Some(Self {
            data: dirs.data_dir().to_path_buf(),
            cache: dirs.cache_dir().to_path_buf(),
        })
    }

    /// The preference database, e.g. `~/.local/share/effects/settings.db`.
    pub fn settings_db(&self) -> PathBuf {
        self.data.join("settings.db")
    }

    /// The log of the current run, e.g. `~/.cache/effects/latest.log`.
    pub fn log_file(&self) -> PathBuf {
        self.cache.join(LATEST_LOG)
    }

    /// Creates both directories.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data)?;
        fs::create_dir_all(&self.cache)
    }

    /// Archives the previous run's log under a timestamped name and prunes
    /// old archives.
    pub fn rotate_logs(&self) -> io::Result<()> {
        let latest = self.log_file();
        if latest.exists() {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            fs::rename(&latest, self.cache.join(format!("{stamp}.log")))?;
        }
        prune_logs(&self.cache, KEEP_LOGS)?;
        Ok(())
    }
}

/// Deletes the oldest archived logs in `dir` beyond `keep`. Returns how many
/// were removed.
fn prune_logs(dir: &Path, keep: usize) -> io::Result<usize> {
    let mut archived: Vec<_> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    if archived.len() <= keep {
        return Ok(0);
    }

    archived.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    let excess = archived.len() - keep;
    for entry in &archived[..excess] {
        fs::remove_file(entry.path())?;
    }
    Ok(excess)
}
