// src/infrastructure/record_store.rs
//
// Record Store - durable JSON documents, one per named collection
//
// CRITICAL RULES:
// - A document is only ever replaced by write-to-temp + rename
// - The previous version is copied to `backups/` before every replace
// - Every read and every write holds the collection's lock
// - One lock per collection name; collections never block each other
// - Unparsable content is a StoreCorruption, never a partial result

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::infrastructure::backup::{self, BACKUP_DIR};

const EMPTY_DOCUMENT: &[u8] = b"[]";

/// Outcome of a read-modify-write closure.
/// Only `Changed` rewrites the document (and takes a backup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<R> {
    Unchanged(R),
    Changed(R),
}

/// Owner of a data directory and of the per-collection locks
#[derive(Debug)]
pub struct RecordStore {
    root: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RecordStore {
    /// Open (and create if missing) a data directory
    pub fn open(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        log::debug!("Record store opened at {}", root.display());

        Ok(Self {
            root,
            locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<name>.json`
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }

    /// Typed handle on a collection. Handles for the same name share one lock.
    pub fn collection<T>(&self, name: &str) -> AppResult<Collection<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let lock = {
            let mut locks = self.locks.lock()?;
            locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        Ok(Collection {
            name: name.to_string(),
            path: self.document_path(name),
            backup_dir: self.backup_dir(),
            lock,
            _records: PhantomData,
        })
    }

    /// Full collection; an absent or blank document reads as empty
    pub fn load<T>(&self, name: &str) -> AppResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.collection(name)?.load()
    }

    /// Replace the whole collection atomically
    pub fn save_all<T>(&self, name: &str, items: &[T]) -> AppResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.collection(name)?.save_all(items)
    }

    /// Backups of a collection's document, oldest first
    pub fn list_backups(&self, name: &str) -> AppResult<Vec<PathBuf>> {
        let file_name = format!("{}.json", name);
        backup::list_backups(&file_name, &self.backup_dir())
    }

    /// See [`Collection::restore`]
    pub fn restore<T>(&self, name: &str, backup_path: &Path) -> AppResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.collection::<T>(name)?.restore(backup_path)
    }
}

/// A named collection of `T` backed by one JSON document
#[derive(Debug)]
pub struct Collection<T> {
    name: String,
    path: PathBuf,
    backup_dir: PathBuf,
    lock: Arc<Mutex<()>>,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            backup_dir: self.backup_dir.clone(),
            lock: Arc::clone(&self.lock),
            _records: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppResult<Vec<T>> {
        let _guard = self.lock.lock()?;
        self.read_locked()
    }

    pub fn save_all(&self, items: &[T]) -> AppResult<()> {
        let _guard = self.lock.lock()?;
        self.write_locked(items)
    }

    /// Load, let `f` edit the records, and persist if it reports a change.
    /// The whole cycle is one critical section.
    pub fn modify<R, F>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> AppResult<Mutation<R>>,
    {
        let _guard = self.lock.lock()?;
        let mut items = self.read_locked()?;

        match f(&mut items)? {
            Mutation::Unchanged(result) => Ok(result),
            Mutation::Changed(result) => {
                self.write_locked(&items)?;
                Ok(result)
            }
        }
    }

    /// Backups of this collection, oldest first
    pub fn list_backups(&self) -> AppResult<Vec<PathBuf>> {
        let file_name = backup::file_name_of(&self.path)?;
        backup::list_backups(&file_name, &self.backup_dir)
    }

    /// Install a backup as the current document.
    /// The backup must parse; the document it replaces is backed up first.
    pub fn restore(&self, backup_path: &Path) -> AppResult<()> {
        let _guard = self.lock.lock()?;

        let bytes = fs::read(backup_path)?;
        serde_json::from_slice::<Vec<T>>(&bytes).map_err(|source| AppError::StoreCorruption {
            path: backup_path.to_path_buf(),
            source,
        })?;

        if self.path.exists() {
            backup::create_backup(&self.path, &self.backup_dir)?;
        }
        write_atomic(&self.path, &bytes)?;

        log::info!(
            "Restored collection '{}' from {}",
            self.name,
            backup_path.display()
        );
        Ok(())
    }

    fn read_locked(&self) -> AppResult<Vec<T>> {
        if !self.path.exists() {
            log::warn!(
                "Document {} missing, initializing empty collection",
                self.path.display()
            );
            write_atomic(&self.path, EMPTY_DOCUMENT)?;
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            log::warn!(
                "Document {} is blank, initializing empty collection",
                self.path.display()
            );
            write_atomic(&self.path, EMPTY_DOCUMENT)?;
            return Ok(Vec::new());
        }

        let items: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|source| AppError::StoreCorruption {
                path: self.path.clone(),
                source,
            })?;

        log::debug!("Loaded {} records from '{}'", items.len(), self.name);
        Ok(items)
    }

    fn write_locked(&self, items: &[T]) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(items)?;

        if self.path.exists() {
            backup::create_backup(&self.path, &self.backup_dir)?;
        }
        write_atomic(&self.path, &json)?;

        log::debug!("Saved {} records to '{}'", items.len(), self.name);
        Ok(())
    }
}

/// Write to `<file>.tmp`, sync it, then rename over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file_name = backup::file_name_of(path)?;
    let temp_path = path.with_file_name(format!("{}.tmp", file_name));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(AppError::Io(e));
    }

    sync_directory(path)
}

#[cfg(unix)]
fn sync_directory(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_directory(_path: &Path) -> AppResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::thread;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    fn store() -> (TempDir, RecordStore) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let (_dir, store) = store();
        let notes = vec![note(3, "c"), note(1, "a"), note(2, "b")];

        store.save_all("notes", &notes).unwrap();
        let loaded: Vec<Note> = store.load("notes").unwrap();

        assert_eq!(loaded, notes);
    }

    #[test]
    fn test_missing_document_is_initialized() {
        let (_dir, store) = store();

        let loaded: Vec<Note> = store.load("notes").unwrap();

        assert!(loaded.is_empty());
        let path = store.document_path("notes");
        assert_eq!(fs::read(&path).unwrap(), EMPTY_DOCUMENT);
        assert!(!store.backup_dir().exists());
    }

    #[test]
    fn test_blank_document_is_initialized() {
        let (_dir, store) = store();
        let path = store.document_path("notes");
        fs::write(&path, "  \n").unwrap();

        let loaded: Vec<Note> = store.load("notes").unwrap();

        assert!(loaded.is_empty());
        assert_eq!(fs::read(&path).unwrap(), EMPTY_DOCUMENT);
    }

    #[test]
    fn test_malformed_document_is_corruption() {
        let (_dir, store) = store();
        let path = store.document_path("notes");
        fs::write(&path, "[{\"id\": 1, \"text\": ").unwrap();

        let result = store.load::<Note>("notes");

        match result {
            Err(AppError::StoreCorruption { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected StoreCorruption, got {:?}", other),
        }
        // the corrupt document is left for inspection
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[{\"id\": 1, \"text\": "
        );
    }

    #[test]
    fn test_save_backs_up_previous_version() {
        let (_dir, store) = store();

        store.save_all("notes", &[note(1, "first")]).unwrap();
        assert!(store.collection::<Note>("notes").unwrap().list_backups().unwrap().is_empty());

        store.save_all("notes", &[note(1, "second")]).unwrap();
        let backups = store.collection::<Note>("notes").unwrap().list_backups().unwrap();
        assert_eq!(backups.len(), 1);

        let previous: Vec<Note> =
            serde_json::from_slice(&fs::read(&backups[0]).unwrap()).unwrap();
        assert_eq!(previous, vec![note(1, "first")]);
        assert!(!store.root().join("notes.json.tmp").exists());
    }

    #[test]
    fn test_unchanged_mutation_does_not_write() {
        let (_dir, store) = store();
        let notes = store.collection::<Note>("notes").unwrap();
        notes.save_all(&[note(1, "a")]).unwrap();
        let before = fs::read(notes.path()).unwrap();

        let found = notes
            .modify(|items| Ok(Mutation::Unchanged(items.iter().any(|n| n.id == 9))))
            .unwrap();

        assert!(!found);
        assert_eq!(fs::read(notes.path()).unwrap(), before);
        assert!(notes.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_failed_mutation_does_not_write() {
        let (_dir, store) = store();
        let notes = store.collection::<Note>("notes").unwrap();
        notes.save_all(&[note(1, "a")]).unwrap();

        let result: AppResult<()> = notes.modify(|items| {
            items.clear();
            Err(AppError::ConstraintViolation("nope".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(notes.load().unwrap(), vec![note(1, "a")]);
    }

    #[test]
    fn test_concurrent_modifications_are_serialized() {
        let (_dir, store) = store();
        let notes = store.collection::<Note>("notes").unwrap();

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let notes = notes.clone();
                thread::spawn(move || {
                    for i in 0..10u32 {
                        notes
                            .modify(|items| {
                                items.push(note(t * 100 + i, "x"));
                                Ok(Mutation::Changed(()))
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(notes.load().unwrap().len(), 80);
    }

    #[test]
    fn test_handles_share_one_lock_per_name() {
        let (_dir, store) = store();
        let a = store.collection::<Note>("notes").unwrap();
        let b = store.collection::<Note>("notes").unwrap();
        let other = store.collection::<Note>("others").unwrap();

        assert!(Arc::ptr_eq(&a.lock, &b.lock));
        assert!(!Arc::ptr_eq(&a.lock, &other.lock));
    }

    #[test]
    fn test_restore_installs_backup() {
        let (_dir, store) = store();
        let notes = store.collection::<Note>("notes").unwrap();
        notes.save_all(&[note(1, "original")]).unwrap();
        notes.save_all(&[note(1, "edited")]).unwrap();

        let backups = notes.list_backups().unwrap();
        notes.restore(&backups[0]).unwrap();

        assert_eq!(notes.load().unwrap(), vec![note(1, "original")]);
        // the edited version was kept too
        assert_eq!(notes.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_restore_rejects_corrupt_backup() {
        let (_dir, store) = store();
        let notes = store.collection::<Note>("notes").unwrap();
        notes.save_all(&[note(1, "keep")]).unwrap();

        let bogus = store.root().join("bogus.json");
        fs::write(&bogus, "not json").unwrap();

        assert!(matches!(
            notes.restore(&bogus),
            Err(AppError::StoreCorruption { .. })
        ));
        assert_eq!(notes.load().unwrap(), vec![note(1, "keep")]);
    }

    #[test]
    fn test_store_level_restore() {
        let (_dir, store) = store();
        store.save_all("notes", &[note(1, "v1")]).unwrap();
        store.save_all("notes", &[note(1, "v2")]).unwrap();

        let backups = store.list_backups("notes").unwrap();
        assert_eq!(backups.len(), 1);

        store.restore::<Note>("notes", &backups[0]).unwrap();
        let loaded: Vec<Note> = store.load("notes").unwrap();
        assert_eq!(loaded, vec![note(1, "v1")]);
    }
}
