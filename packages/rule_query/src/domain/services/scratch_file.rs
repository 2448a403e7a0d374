//! Session-owned scratch file holding the generated program.
//!
//! The name is reserved with `create_new`, so the existence check and the
//! creation are one step. The file is removed by [`ScratchFile::remove`] or,
//! failing that, when the guard is dropped.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    removed: bool,
}

impl ScratchFile {
    /// Reserves `<uuid>.<extension>` in `dir`.
    pub fn allocate(dir: &Path, extension: &str) -> std::io::Result<Self> {
        Self::allocate_with(dir, extension, || Uuid::new_v4().to_string())
    }

    /// Reserves a name from `next_stem`, skipping any that already exist in `dir`.
    pub fn allocate_with<F>(dir: &Path, extension: &str, mut next_stem: F) -> std::io::Result<Self>
    where
        F: FnMut() -> String,
    {
        loop {
            let path = dir.join(format!("{}.{}", next_stem(), extension));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    tracing::debug!(path = %path.display(), "reserved scratch file");
                    return Ok(Self { path, removed: false });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "scratch name taken, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file contents.
    pub async fn write(&self, contents: &str) -> std::io::Result<()> {
        tokio::fs::write(&self.path, contents).await
    }

    pub async fn read(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }

    /// Deletes the file now and reports the outcome.
    pub fn remove(mut self) -> std::io::Result<()> {
        self.removed = true;
        std::fs::remove_file(&self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "scratch file removed on drop"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "could not remove scratch file"),
        }
    }
}
