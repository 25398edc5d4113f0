//! Storage backends for the vault document.
//!
//! A backend persists the whole [`VaultDocument`] at once; there is no
//! finer write granularity. That keeps the storage contract trivial
//! (load/save) and gives multi-collection operations a single commit
//! point.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VaultError};
use crate::store::document::VaultDocument;

/// Whole-document storage interface.
///
/// Implementations must make `save` atomic: a crash mid-save must leave
/// either the previous document or the new one, never a torn mix.
pub trait VaultBackend: Send {
    /// Load the current document. A backend with no stored data returns
    /// the empty default document.
    fn load(&self) -> Result<VaultDocument>;

    /// Persist the document, replacing whatever was stored before.
    fn save(&mut self, document: &VaultDocument) -> Result<()>;
}

/// In-memory backend for tests and ephemeral vaults.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: VaultDocument,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VaultBackend for MemoryBackend {
    fn load(&self) -> Result<VaultDocument> {
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &VaultDocument) -> Result<()> {
        self.document = document.clone();
        Ok(())
    }
}

/// JSON-file backend.
///
/// Writes go to a sibling temp file first and are moved into place with
/// `rename`, so the vault file on disk is always a complete document.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl VaultBackend for JsonFileBackend {
    fn load(&self) -> Result<VaultDocument> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(VaultDocument::default());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes)
            .map_err(|err| VaultError::Storage(format!("vault file is not valid JSON: {err}")))
    }

    fn save(&mut self, document: &VaultDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(document)?;
        let temp = self.temp_path();
        fs::write(&temp, &json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_round_trip() {
        let mut backend = MemoryBackend::new();
        let mut document = VaultDocument::default();
        document.next_credential_id = 42;
        backend.save(&document).unwrap();
        assert_eq!(backend.load().unwrap().next_credential_id, 42);
    }

    #[test]
    fn test_missing_file_loads_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("vault.json"));
        let document = backend.load().unwrap();
        assert!(document.master.is_none());
        assert!(document.credentials.is_empty());
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("vault.json"));

        let mut document = VaultDocument::default();
        document.categories.push("Gaming".to_string());
        backend.save(&document).unwrap();

        let reloaded = backend.load().unwrap();
        assert!(reloaded.categories.contains(&"Gaming".to_string()));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("nested/deeper/vault.json"));
        backend.save(&VaultDocument::default()).unwrap();
        assert!(backend.path().exists());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("vault.json"));
        backend.save(&VaultDocument::default()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("vault.json")]);
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        fs::write(&path, b"not json").unwrap();
        let backend = JsonFileBackend::new(path);
        assert!(matches!(backend.load(), Err(VaultError::Storage(_))));
    }
}
