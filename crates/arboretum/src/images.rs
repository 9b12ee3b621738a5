//! Image files served straight from a directory

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CatalogError, Result};

/// Access to the images directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create a store over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the images live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filenames in the images directory, in whatever order the filesystem
    /// returns them.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut read_dir = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| CatalogError::io(&self.dir, e))?;

        let mut names = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| CatalogError::io(&self.dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| CatalogError::io(entry.path(), e))?;
            if file_type.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Read an image by its (possibly percent-encoded) filename.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let decoded = urlencoding::decode(filename)
            .map_err(|_| CatalogError::not_found("image", filename))?;
        let path = self
            .resolve(&decoded)
            .ok_or_else(|| CatalogError::not_found("image", &*decoded))?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::not_found("image", &*decoded))
            }
            Err(e) => Err(CatalogError::io(path, e)),
        }
    }

    /// Write (or overwrite) an image file.
    pub async fn write(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        let path = self
            .resolve(filename)
            .ok_or_else(|| CatalogError::Upload(format!("invalid image filename `{}`", filename)))?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CatalogError::io(&path, e))?;

        debug!(file = %path.display(), bytes = bytes.len(), "wrote image");
        Ok(())
    }

    /// Map a bare filename to a path inside the images directory.
    ///
    /// Anything that is not a single normal path component yields `None`.
    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        is_plain_filename(filename).then(|| self.dir.join(filename))
    }
}

/// Whether a name is a single filename with no directory parts.
pub fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
