//! Backup step run before mutating a save.
//!
//! The codec never backs anything up itself. The CLI calls a [`Backup`]
//! before every `add`, `remove`, `import` or `community`.

use crate::error::{BanListError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Copies a save aside before it is modified.
pub trait Backup {
    /// Back up `path`, returning where the copy went.
    ///
    /// Returns `Ok(None)` when there was nothing to back up.
    fn backup(&self, path: &Path) -> Result<Option<PathBuf>>;
}

/// Keeps a single `.bak` copy next to the save (`Save_BanList.sav` → `Save_BanList.bak`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BakFileBackup;

impl Backup for BakFileBackup {
    fn backup(&self, path: &Path) -> Result<Option<PathBuf>> {
        if !path.exists() {
            warn!(path = %path.display(), "save not found, no backup created");
            return Ok(None);
        }

        let target = backup_path(path);
        fs::copy(path, &target).map_err(|e| BanListError::io(&target, e))?;
        info!(backup = %target.display(), "backup created");
        Ok(Some(target))
    }
}

/// Skips the backup step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackup;

impl Backup for NoBackup {
    fn backup(&self, _path: &Path) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Location of the `.bak` copy for a save.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("bak")
}

/// Restore a save from its `.bak` copy.
///
/// # Errors
///
/// Returns `BackupMissing` when no `.bak` file exists.
pub fn restore_from_backup(path: &Path) -> Result<PathBuf> {
    let source = backup_path(path);
    if !source.exists() {
        return Err(BanListError::BackupMissing { path: source });
    }

    fs::copy(&source, path).map_err(|e| BanListError::io(path, e))?;
    info!(backup = %source.display(), "save restored from backup");
    Ok(source)
}
