//! Persistence
//!
//! The engine reads and writes named JSON blobs through the [`Store`]
//! trait, so the core stays independent of storage technology and is
//! unit-testable with the in-memory store. Absent keys fall back to
//! the documented defaults.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Blob keys used by the engine.
pub mod keys {
    /// Account snapshot.
    pub const ACCOUNT: &str = "account";
    /// Round history list.
    pub const HISTORY: &str = "history";
    /// Achievement progress.
    pub const ACHIEVEMENTS: &str = "achievements";
    /// Cosmetic selections and unlocks.
    pub const CUSTOMIZATION: &str = "customization";
}

/// Storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("storage i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded.
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Named JSON blob store.
pub trait Store {
    /// Read the raw blob for `key`; `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write the raw blob for `key`.
    fn write(&mut self, key: &str, json: &str) -> Result<(), StoreError>;
}

/// Load a typed blob, falling back to `T::default()` when the key is
/// absent or the blob is unreadable.
///
/// A corrupt blob is logged and effectively replaced on the next
/// save; in-memory state is never poisoned by it.
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn Store, key: &str) -> T {
    match store.read(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "corrupt blob, using defaults");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(error) => {
            warn!(key, %error, "store read failed, using defaults");
            T::default()
        }
    }
}

/// Serialize and write a typed blob.
pub fn save<T: Serialize>(store: &mut dyn Store, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.write(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::UserAccount;

    #[test]
    fn absent_key_yields_defaults() {
        let store = MemoryStore::new();
        let account: UserAccount = load_or_default(&store, keys::ACCOUNT);
        assert_eq!(account, UserAccount::default());
    }

    #[test]
    fn corrupt_blob_yields_defaults() {
        let mut store = MemoryStore::new();
        store.write(keys::ACCOUNT, "{not json").unwrap();
        let account: UserAccount = load_or_default(&store, keys::ACCOUNT);
        assert_eq!(account, UserAccount::default());
    }

    #[test]
    fn typed_round_trip() {
        let mut store = MemoryStore::new();
        let mut account = UserAccount::default();
        account.balance = 4321;
        save(&mut store, keys::ACCOUNT, &account).unwrap();
        let back: UserAccount = load_or_default(&store, keys::ACCOUNT);
        assert_eq!(back, account);
    }
}
