//! Storage for uploaded databases and generated diagrams.
//!
//! Files are named after a SHA-256 digest of their content, so concurrent
//! uploads of different databases never share a path and re-uploading the
//! same bytes is a no-op.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf}
};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{config::StorageConfig, diagram::WeakEntitySelection, error::DiagramError};

/// Hex digits of the digest kept in file names
const NAME_DIGEST_LEN: usize = 16;

/// Extension used when an upload has no usable one
const DEFAULT_EXTENSION: &str = "db";

#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    output_dir: PathBuf
}

impl Storage {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into()
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.output_dir.clone())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Store uploaded bytes and return their stable path.
    ///
    /// `original_name` only contributes its extension.
    pub fn store_upload(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, DiagramError> {
        ensure_dir(&self.upload_dir)?;
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let name = format!(
            "{}.{}",
            short_digest(hasher),
            upload_extension(original_name)
        );
        let path = self.upload_dir.join(name);
        if path.exists() {
            debug!(path = %path.display(), "upload already stored");
            return Ok(path);
        }
        fs::write(&path, bytes).map_err(|e| DiagramError::storage(path.display().to_string(), e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "stored upload");
        Ok(path)
    }

    /// Copy a database file into the upload directory.
    pub fn import_file(&self, source: &Path) -> Result<PathBuf, DiagramError> {
        let bytes =
            fs::read(source).map_err(|e| DiagramError::storage(source.display().to_string(), e))?;
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.store_upload(&name, &bytes)
    }

    /// Output base path (without extension) for a diagram of `database`
    /// with the given weak-entity selection.
    pub fn diagram_base(
        &self,
        database: &Path,
        weak: &WeakEntitySelection
    ) -> Result<PathBuf, DiagramError> {
        ensure_dir(&self.output_dir)?;
        let mut hasher = Sha256::new();
        File::open(database)
            .and_then(|mut file| io::copy(&mut file, &mut hasher))
            .map_err(|e| DiagramError::storage(database.display().to_string(), e))?;
        for name in weak.sorted() {
            hasher.update([0u8]);
            hasher.update(name.as_bytes());
        }
        Ok(self.output_dir.join(format!("diagram_{}", short_digest(hasher))))
    }
}

fn ensure_dir(dir: &Path) -> Result<(), DiagramError> {
    fs::create_dir_all(dir).map_err(|e| DiagramError::storage(dir.display().to_string(), e))
}

fn short_digest(hasher: Sha256) -> String {
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(NAME_DIGEST_LEN);
    hex
}

fn upload_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
