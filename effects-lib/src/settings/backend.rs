//! Preference storage backend trait.

use async_trait::async_trait;

use crate::error::SettingsError;

/// Raw byte storage for preferences.
///
/// [`SettingsProvider`](super::SettingsProvider) layers typed encoding on
/// top.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Reads the stored bytes for `key`.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), SettingsError>;

    /// Lists every stored key.
    async fn keys(&self) -> Result<Vec<String>, SettingsError>;
}
