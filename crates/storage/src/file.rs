//! File-backed table storage
//!
//! Each table lives in `<dir>/<table>.json`. Saves write the whole document to
//! `<table>.json.tmp` and rename it over the target, so readers only ever see
//! a complete document.

use jadb_core::error::StorageError;
use jadb_core::record::TableDocument;
use jadb_core::traits::TableStorage;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Table storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage in `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            debug!(target: "jadb::storage", dir = %dir.display(), "Created data directory");
        }
        Ok(FileStorage { dir })
    }

    /// Data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing `table`
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for names that would escape the data directory.
    pub fn path_for(&self, table: &str) -> Result<PathBuf, StorageError> {
        validate_table_name(table)?;
        Ok(self.dir.join(format!("{}.json", table)))
    }
}

/// Reject names that are empty or could address a file outside the directory
pub fn validate_table_name(table: &str) -> Result<(), StorageError> {
    if table.is_empty()
        || table.contains('/')
        || table.contains('\\')
        || table.contains('\0')
        || table == "."
        || table.contains("..")
    {
        return Err(StorageError::InvalidName(table.to_string()));
    }
    Ok(())
}

impl TableStorage for FileStorage {
    fn exists(&self, table: &str) -> Result<bool, StorageError> {
        Ok(self.path_for(table)?.is_file())
    }

    fn load(&self, table: &str) -> Result<TableDocument, StorageError> {
        let path = self.path_for(table)?;
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound,
            _ => StorageError::Io(e),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, table: &str, document: &TableDocument) -> Result<(), StorageError> {
        let path = self.path_for(table)?;
        let temp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(document)?;

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&temp_path, &path)) {
            warn!(
                target: "jadb::storage",
                temp_path = %temp_path.display(),
                error = %e,
                "Table write failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::Io(e));
        }
        Ok(())
    }

    fn remove(&self, table: &str) -> Result<(), StorageError> {
        let path = self.path_for(table)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
