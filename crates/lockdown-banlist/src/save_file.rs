//! Ban list operations against a save file on disk.
//!
//! Every operation reads the whole file, decodes the list, and for writes
//! builds a whole new buffer and writes it back. No parsed state is kept
//! between calls, so a file changed by the game in between is always seen
//! fresh.
//!
//! Nothing here guards against a second writer touching the file between
//! the read and the write. Callers must serialize operations on the same
//! file.

use crate::error::{BanListError, Result};
use lockdown_gvas::{ParsedBanList, mutator, parse, record};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Handle to a save file that passed the precondition checks.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    /// Check that `path` exists and can be opened for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` for a missing path and `FileNotAccessible`
    /// when it cannot be opened read/write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Err(BanListError::FileNotFound { path });
        }

        if let Err(source) = OpenOptions::new().read(true).write(true).open(&path) {
            return Err(BanListError::FileNotAccessible { path, source });
        }

        Ok(Self { path })
    }

    /// Path of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<(Vec<u8>, ParsedBanList)> {
        let buffer = fs::read(&self.path).map_err(|e| BanListError::io(&self.path, e))?;
        let parsed = parse(&buffer)?;
        debug!(
            path = %self.path.display(),
            len = buffer.len(),
            count = parsed.identifiers.len(),
            source = ?parsed.source,
            "read ban list"
        );
        Ok((buffer, parsed))
    }

    fn write(&self, buffer: &[u8], parsed: &ParsedBanList, identifiers: &[String]) -> Result<()> {
        let updated = mutator::rewrite(buffer, parsed.writable_region()?, identifiers)?;
        fs::write(&self.path, &updated).map_err(|e| BanListError::io(&self.path, e))?;
        info!(
            path = %self.path.display(),
            count = identifiers.len(),
            "wrote ban list"
        );
        Ok(())
    }

    /// Identifiers currently stored, in file order.
    pub fn list(&self) -> Result<Vec<String>> {
        let (_, parsed) = self.read()?;
        Ok(parsed.identifiers)
    }

    /// Merge `identifiers` into the stored list.
    ///
    /// Returns how many identifiers were not already present. The file is
    /// left untouched when nothing is new.
    pub fn add<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<usize> {
        let (buffer, parsed) = self.read()?;
        let (merged, added) = mutator::merge(&parsed.identifiers, identifiers);

        if merged == parsed.identifiers {
            debug!("no new identifiers, save left unchanged");
            return Ok(added);
        }

        self.write(&buffer, &parsed, &merged)?;
        Ok(added)
    }

    /// Remove `identifier` from the stored list.
    ///
    /// Returns 1 when the identifier was present, 0 otherwise. The stored
    /// list is treated as a set, so copies stored more than once are all
    /// dropped and duplicates of other entries collapse in the rewrite. The
    /// file is left untouched when the identifier is not present.
    pub fn remove(&self, identifier: &str) -> Result<usize> {
        let (buffer, parsed) = self.read()?;
        let (remaining, removed) = mutator::without(&parsed.identifiers, identifier);

        if removed == 0 {
            debug!(identifier, "identifier not present, save left unchanged");
            return Ok(0);
        }

        self.write(&buffer, &parsed, &remaining)?;
        Ok(removed)
    }
}

/// List the identifiers stored in the save at `path`.
pub fn list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    SaveFile::open(path.as_ref())?.list()
}

/// Add `identifiers` to the save at `path`, returning how many were new.
pub fn add<S: AsRef<str>>(path: impl AsRef<Path>, identifiers: &[S]) -> Result<usize> {
    SaveFile::open(path.as_ref())?.add(identifiers)
}

/// Remove `identifier` from the save at `path`, returning 0 or 1.
pub fn remove(path: impl AsRef<Path>, identifier: &str) -> Result<usize> {
    SaveFile::open(path.as_ref())?.remove(identifier)
}

/// Check that `identifier` has the Steam64 shape.
///
/// The codec stores any text; this check is applied by callers before
/// handing user input to [`SaveFile::add`] or [`SaveFile::remove`].
pub fn validate_identifier(identifier: &str) -> Result<()> {
    if record::is_identifier_shaped(identifier.as_bytes()) {
        Ok(())
    } else {
        warn!(identifier, "rejected malformed Steam64 ID");
        Err(BanListError::InvalidIdentifier(identifier.to_string()))
    }
}
