//! Durable file writes shared by the vault store and the key manager.
//!
//! Every write goes to a hidden sibling file first, is fsynced, and only
//! then renamed over the target, so readers see either the old contents or
//! the new ones and never a torn file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Permissions for secret material (owner read/write).
pub const MODE_PRIVATE: u32 = 0o600;

/// Permissions for material that may be shared (public keys).
pub const MODE_PUBLIC: u32 = 0o644;

/// Hidden sibling path used while writing `path`: `<dir>/.<name>.<suffix>`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.{suffix}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// Write `bytes` to exactly `path` (truncating), set `mode`, and fsync.
pub fn write_synced(path: &Path, bytes: &[u8], mode: u32) -> io::Result<()> {
    ensure_parent(path)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    // `mode` only applies on creation; enforce it for pre-existing files too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

/// Replace `path` with `bytes` atomically (temp file + fsync + rename).
pub fn write_atomic(path: &Path, bytes: &[u8], mode: u32) -> io::Result<()> {
    let tmp_path = sibling_path(path, "tmp");

    if let Err(e) = write_synced(&tmp_path, bytes, mode) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    sync_parent(path)
}

/// Fsync the directory containing `path` so a rename is durable.
pub fn sync_parent(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}
