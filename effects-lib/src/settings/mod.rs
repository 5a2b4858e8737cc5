//! Typed preference storage.

mod backend;
mod memory;
mod preferences;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use preferences::{Preferences, keys};
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::SettingsError;

/// Typed access to a [`SettingsBackend`].
///
/// Values are encoded with bincode.
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    /// Wraps a backend.
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A provider that forgets everything on exit.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Reads a typed value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.backend.load(key).await? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(SettingsError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Writes a typed value.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(SettingsError::Serialization)?;
        self.backend.store(key, bytes).await
    }

    /// Writes raw bytes, bypassing encoding.
    pub async fn set_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), SettingsError> {
        self.backend.store(key, bytes).await
    }

    /// Removes a key.
    pub async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.remove(key).await
    }

    /// Lists the stored keys.
    pub async fn keys(&self) -> Result<Vec<String>, SettingsError> {
        self.backend.keys().await
    }
}
