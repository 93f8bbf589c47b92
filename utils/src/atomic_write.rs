//! Crash-safe document replacement.
//!
//! The new contents go to a temp file in the destination's directory, which is
//! then renamed over the target. A reader sees either the old document or the
//! new one, never a partial write. Where rename-over-existing fails (Windows),
//! the old file is moved to `<name>.bak` first and restored if the second
//! rename also fails.

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSyncPolicy {
    SyncAll,
    SkipSync,
}

#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Sync the temp file before it is renamed into place.
    pub file_sync: FileSyncPolicy,
    /// Carry the replaced file's permissions over to the new one.
    pub preserve_permissions: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            file_sync: FileSyncPolicy::SyncAll,
            preserve_permissions: true,
        }
    }
}

pub fn replace_file(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    replace_file_with_options(path, bytes, WriteOptions::default())
}

pub fn replace_file_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let previous: Option<Permissions> = if options.preserve_permissions {
        fs::metadata(path).ok().map(|meta| meta.permissions())
    } else {
        None
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if matches!(options.file_sync, FileSyncPolicy::SyncAll) {
        tmp.as_file().sync_all()?;
    }
    if let Some(permissions) = &previous {
        fs::set_permissions(tmp.path(), permissions.clone())?;
    }

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup_path = path.with_extension("bak");
        let _ = fs::remove_file(&backup_path);
        fs::rename(path, &backup_path)?;

        if let Err(rename_err) = err.file.persist(path) {
            let _ = fs::rename(&backup_path, path);
            return Err(rename_err.error);
        }
        if let Err(e) = fs::remove_file(&backup_path) {
            tracing::warn!(
                path = %backup_path.display(),
                "Failed to remove .bak after replacing document: {e}"
            );
        }
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Document written");
    Ok(())
}
