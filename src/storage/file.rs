//! File-backed store: one JSON file per key under a root directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Store, StoreError};

/// Store that keeps each blob in `<root>/<key>.json`.
///
/// Keys are the engine's fixed identifiers ([`super::keys`]), never
/// user input, so no path sanitization is applied.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating the directory if needed) a store at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, key: &str, json: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Write-then-rename so a crash mid-write cannot corrupt the blob
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        debug!(key, bytes = json.len(), "blob written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.read(keys::ACCOUNT).unwrap(), None);
    }

    #[test]
    fn blobs_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.write(keys::ACCOUNT, r#"{"balance":42}"#).unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            store.read(keys::ACCOUNT).unwrap().as_deref(),
            Some(r#"{"balance":42}"#)
        );
    }

    #[test]
    fn each_key_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.write(keys::ACCOUNT, "{}").unwrap();
        store.write(keys::HISTORY, "[]").unwrap();
        assert!(dir.path().join("account.json").exists());
        assert!(dir.path().join("history.json").exists());
    }
}
