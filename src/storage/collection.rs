//! Whole-document JSON collections
//!
//! Each collection owns one file holding a JSON array. Loading replaces the
//! in-memory list and saving rewrites the whole file; there are no partial
//! updates.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PocketError;

use super::file_io::{read_json_or_else, write_json_atomic};

/// An ordered list of records backed by a JSON file
pub struct JsonCollection<T> {
    path: PathBuf,
    items: RwLock<Vec<T>>,
}

impl<T> JsonCollection<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, PocketError> {
        self.items
            .read()
            .map_err(|e| PocketError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, PocketError> {
        self.items
            .write()
            .map_err(|e| PocketError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load from disk; a missing file is an empty collection
    pub fn load(&self) -> Result<(), PocketError> {
        self.load_or_seed(Vec::new)
    }

    /// Load from disk, using `seed()` when the file doesn't exist yet
    pub fn load_or_seed<F>(&self, seed: F) -> Result<(), PocketError>
    where
        F: FnOnce() -> Vec<T>,
    {
        let loaded: Vec<T> = read_json_or_else(&self.path, seed)?;
        *self.write()? = loaded;
        Ok(())
    }

    /// Write the whole collection to disk
    pub fn save(&self) -> Result<(), PocketError> {
        let items = self.read()?;
        write_json_atomic(&self.path, &*items)
    }

    /// Snapshot of every record in stored order
    pub fn get_all(&self) -> Result<Vec<T>, PocketError> {
        Ok(self.read()?.clone())
    }

    /// First record matching a predicate
    pub fn find<P>(&self, predicate: P) -> Result<Option<T>, PocketError>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().find(|item| predicate(item)).cloned())
    }

    pub fn len(&self) -> Result<usize, PocketError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, PocketError> {
        Ok(self.read()?.is_empty())
    }

    /// Replace the in-memory list (not saved)
    pub fn replace_all(&self, items: Vec<T>) -> Result<(), PocketError> {
        *self.write()? = items;
        Ok(())
    }

    /// Mutate the list under the write lock
    ///
    /// If `f` fails the list is restored to its previous contents.
    pub fn update<R, F>(&self, f: F) -> Result<R, PocketError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, PocketError>,
    {
        let mut items = self.write()?;
        let before = items.clone();
        match f(&mut items) {
            Ok(result) => Ok(result),
            Err(e) => {
                *items = before;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn collection(dir: &TempDir) -> JsonCollection<String> {
        JsonCollection::new(dir.path().join("names.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let names = collection(&dir);
        names.load().unwrap();
        assert!(names.is_empty().unwrap());
    }

    #[test]
    fn test_seed_only_when_missing() {
        let dir = TempDir::new().unwrap();
        let names = collection(&dir);
        names.load_or_seed(|| vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(names.len().unwrap(), 2);

        names.replace_all(vec!["only".into()]).unwrap();
        names.save().unwrap();

        let reloaded = collection(&dir);
        reloaded.load_or_seed(|| vec!["seed".into()]).unwrap();
        assert_eq!(reloaded.get_all().unwrap(), vec!["only".to_string()]);
    }

    #[test]
    fn test_failed_update_rolls_back() {
        let dir = TempDir::new().unwrap();
        let names = collection(&dir);
        names.replace_all(vec!["keep".into()]).unwrap();

        let result: Result<(), PocketError> = names.update(|items| {
            items.clear();
            Err(PocketError::Validation("nope".into()))
        });

        assert!(result.is_err());
        assert_eq!(names.get_all().unwrap(), vec!["keep".to_string()]);
    }

    #[test]
    fn test_find() {
        let dir = TempDir::new().unwrap();
        let names = collection(&dir);
        names
            .replace_all(vec!["Rent".into(), "Food".into()])
            .unwrap();
        assert_eq!(
            names.find(|n| n.starts_with('F')).unwrap(),
            Some("Food".to_string())
        );
        assert_eq!(names.find(|n| n.is_empty()).unwrap(), None);
    }
}
