//! Staged installation of key files.
//!
//! Key material that replaces or creates several files is first written
//! next to each target as a hidden, fsynced sibling.  Only once every
//! file is staged are they renamed into place, in the order given.
//! Dropping a `StagedFiles` that was never installed removes the staged
//! siblings again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fsio;

/// One file to stage: its final path, contents, and Unix mode.
pub struct StageItem<'a> {
    pub target: &'a Path,
    pub contents: &'a [u8],
    pub mode: u32,
}

struct Staged {
    staged: PathBuf,
    target: PathBuf,
}

/// A set of staged files waiting to be renamed into place.
pub struct StagedFiles {
    files: Vec<Staged>,
}

/// Why `StagedFiles::install` stopped part-way.
#[derive(Debug)]
pub struct InstallError {
    /// The staged file whose rename failed.
    pub staged: PathBuf,
    /// Targets that were already replaced before the failure.
    pub installed: Vec<PathBuf>,
    /// Staged files still on disk (including `staged`).
    pub remaining: Vec<PathBuf>,
    pub source: io::Error,
}

impl StagedFiles {
    /// Write every item to `.<name>.<suffix>` beside its target.
    ///
    /// If any write fails, the ones already written are removed.
    pub fn stage(items: &[StageItem<'_>], suffix: &str) -> io::Result<Self> {
        let mut staged = Self {
            files: Vec::with_capacity(items.len()),
        };

        for item in items {
            let path = fsio::sibling_path(item.target, suffix);
            // Push first so a partial write is cleaned up by Drop too.
            staged.files.push(Staged {
                staged: path.clone(),
                target: item.target.to_path_buf(),
            });
            fsio::write_synced(&path, item.contents, item.mode)?;
            debug!(path = %path.display(), "staged key file");
        }

        Ok(staged)
    }

    /// Paths of the staged siblings, in install order.
    #[cfg(test)]
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.staged.clone()).collect()
    }

    /// Rename every staged file over its target, in order.
    ///
    /// On failure nothing is cleaned up: the error lists what was
    /// installed and what is still staged so the caller can decide.
    pub fn install(mut self) -> Result<(), InstallError> {
        let files = std::mem::take(&mut self.files);
        let mut installed = Vec::with_capacity(files.len());

        for (i, file) in files.iter().enumerate() {
            if let Err(source) = fs::rename(&file.staged, &file.target) {
                return Err(InstallError {
                    staged: file.staged.clone(),
                    installed,
                    remaining: files[i..].iter().map(|f| f.staged.clone()).collect(),
                    source,
                });
            }
            let _ = fsio::sync_parent(&file.target);
            installed.push(file.target.clone());
        }

        Ok(())
    }
}

impl Drop for StagedFiles {
    fn drop(&mut self) {
        for file in self.files.drain(..) {
            let _ = fs::remove_file(&file.staged);
        }
    }
}
