//! Durable key-value persistence
//!
//! Every tracker takes a store handle as a constructor argument, so tests run
//! against [`MemoryStore`] and the app against [`JsonFileStore`]. The store
//! holds JSON values keyed by string; last write wins. Read failures degrade
//! to "no data" and write failures are logged and swallowed, so persistence
//! trouble never interrupts gameplay.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// String-keyed store of JSON values, scoped to one learner's device
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: serde_json::Value);
}

/// Typed helpers over [`KeyValueStore`]
pub trait StoreExt: KeyValueStore {
    /// Fetch and decode the value under `key`.
    ///
    /// Missing keys and undecodable values both come back as `None`; a decode
    /// failure is logged so corrupt state is visible in diagnostics.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!("discarding corrupt state under {key:?}: {err}");
                None
            }
        }
    }

    /// Encode and store `value` under `key`.
    ///
    /// Encoding failures are logged and swallowed; the write is best-effort.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => self.set(key, encoded),
            Err(err) => {
                tracing::warn!("failed to encode state for {key:?}: {err}");
            }
        }
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}
