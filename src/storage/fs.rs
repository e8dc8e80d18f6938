// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filesystem operations for JSON and raw records.
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! reader never sees a half-written file.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Entity already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// File-backed storage rooted at a [`StoragePaths`] directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: StoragePaths,
}

impl FileStorage {
    /// Open storage at `paths`, creating the directory layout.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn open(paths: StoragePaths) -> StorageResult<Self> {
        let dirs = [
            paths.users_dir(),
            paths.email_index_dir(),
            paths.session_dir(),
        ];
        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { paths })
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    // ========== Generic JSON Operations ==========

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        let file = open_existing(path.as_ref())?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        let path = path.as_ref();
        self.replace(path, |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            Ok(())
        })
    }

    // ========== Raw File Operations ==========

    /// Read a file as UTF-8 text, `None` if absent.
    pub fn read_text(&self, path: impl AsRef<Path>) -> StorageResult<Option<String>> {
        match fs::read_to_string(path.as_ref()) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write raw text (atomic write via rename).
    pub fn write_text(&self, path: impl AsRef<Path>, text: &str) -> StorageResult<()> {
        self.replace(path.as_ref(), |mut file| {
            file.write_all(text.as_bytes())?;
            file.flush()?;
            Ok(())
        })
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        File::open(path.as_ref()).is_ok()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let path = path.as_ref();
        fs::remove_file(path).map_err(|e| not_found_or_io(e, path))
    }

    /// Delete a file if present. Returns whether anything was removed.
    pub fn delete_if_exists(&self, path: impl AsRef<Path>) -> StorageResult<bool> {
        match fs::remove_file(path.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// List the stems of all files in a directory with the given extension.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        Ok(ids)
    }

    fn replace(
        &self,
        path: &Path,
        write: impl FnOnce(File) -> StorageResult<()>,
    ) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        write(File::create(&temp_path)?)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

fn open_existing(path: &Path) -> StorageResult<File> {
    File::open(path).map_err(|e| not_found_or_io(e, path))
}

fn not_found_or_io(e: io::Error, path: &Path) -> StorageError {
    if e.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(path.display().to_string())
    } else {
        StorageError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::open(StoragePaths::new(temp_dir.path())).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn open_creates_layout() {
        let (storage, _dir) = test_storage();
        assert!(storage.paths().users_dir().is_dir());
        assert!(storage.paths().email_index_dir().is_dir());
        assert!(storage.paths().session_dir().is_dir());
        // idempotent
        FileStorage::open(storage.paths().clone()).unwrap();
    }

    #[test]
    fn json_write_then_read() {
        let (storage, _dir) = test_storage();
        let path = storage.paths().user("u1");
        let sample = Sample {
            name: "alice".to_string(),
            count: 3,
        };
        storage.write_json(&path, &sample).unwrap();
        assert!(storage.exists(&path));
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(storage.read_json::<Sample>(&path).unwrap(), sample);
    }

    #[test]
    fn reading_missing_json_is_not_found() {
        let (storage, _dir) = test_storage();
        let result = storage.read_json::<Sample>(storage.paths().user("nobody"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn text_round_trip_and_delete() {
        let (storage, _dir) = test_storage();
        let path = storage.paths().session_entry("jwt");
        assert_eq!(storage.read_text(&path).unwrap(), None);

        storage.write_text(&path, "a.b.c").unwrap();
        assert_eq!(storage.read_text(&path).unwrap().as_deref(), Some("a.b.c"));

        assert!(storage.delete_if_exists(&path).unwrap());
        assert!(!storage.delete_if_exists(&path).unwrap());
        assert!(matches!(storage.delete(&path), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn list_files_filters_by_extension() {
        let (storage, _dir) = test_storage();
        let users = storage.paths().users_dir();
        storage.write_json(users.join("a.json"), &1).unwrap();
        storage.write_json(users.join("b.json"), &2).unwrap();
        storage.write_text(users.join("c.txt"), "x").unwrap();

        let mut ids = storage.list_files(&users, "json").unwrap();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
