//! Atomic file write helpers.
//!
//! Uses a temp file + rename pattern so a crash never leaves a half-written
//! record behind. Records are subject data, so the default mode is owner-only.

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

/// Upper bound on `-N` suffixes tried by [`write_unique`].
const MAX_UNIQUE_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistMode {
    /// Allow the file to inherit the default umask.
    Default,
    /// Owner-only read/write (0o600 on Unix). Ignored elsewhere.
    #[default]
    OwnerOnly,
}

impl PersistMode {
    #[cfg(unix)]
    fn mode(self) -> Option<u32> {
        match self {
            Self::Default => None,
            Self::OwnerOnly => Some(0o600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSyncPolicy {
    SyncAll,
    SkipSync,
}

#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// File sync policy for the temp file before persisting.
    pub file_sync: FileSyncPolicy,
    /// Permission policy for the created file.
    pub mode: PersistMode,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            file_sync: FileSyncPolicy::SyncAll,
            mode: PersistMode::OwnerOnly,
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn staged(path: &Path, bytes: &[u8], options: WriteOptions) -> io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    #[cfg(unix)]
    if let Some(mode) = options.mode.mode() {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), Permissions::from_mode(mode))?;
    }

    tmp.write_all(bytes)?;
    if matches!(options.file_sync, FileSyncPolicy::SyncAll) {
        tmp.as_file().sync_all()?;
    }
    Ok(tmp)
}

/// Write `bytes` to `path`, replacing any existing file.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8], options: WriteOptions) -> io::Result<()> {
    let path = path.as_ref();
    let tmp = staged(path, bytes, options)?;

    // Persist (rename) - handle Windows where rename fails if target exists.
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
                "Failed to remove .bak after atomic write: {e}"
            );
        }
    }

    debug!(path = %path.display(), bytes = bytes.len(), "atomic write complete");
    Ok(())
}

/// Write `bytes` to `path`, failing with `AlreadyExists` instead of overwriting.
pub fn atomic_write_new(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let tmp = staged(path, bytes, options)?;
    tmp.persist_noclobber(path).map_err(|err| err.error)?;
    debug!(path = %path.display(), bytes = bytes.len(), "atomic create complete");
    Ok(())
}

/// Create `dir/<stem>.<extension>`, or `dir/<stem>-2.<extension>` and so on if
/// taken. Never overwrites. Returns the path written.
pub fn write_unique(
    dir: &Path,
    stem: &str,
    extension: &str,
    bytes: &[u8],
    options: WriteOptions,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    for attempt in 1..=MAX_UNIQUE_ATTEMPTS {
        let name = if attempt == 1 {
            format!("{stem}.{extension}")
        } else {
            format!("{stem}-{attempt}.{extension}")
        };
        let candidate = dir.join(name);
        if candidate.exists() {
            continue;
        }
        match atomic_write_new(&candidate, bytes, options) {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "no free file name for {stem}.{extension} in {}",
            dir.display()
        ),
    ))
}
