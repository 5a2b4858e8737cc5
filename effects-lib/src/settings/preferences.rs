//! The sticky view preferences.

use serde::de::DeserializeOwned;

use super::SettingsProvider;
use crate::error::SettingsError;
use crate::query::{FilterToggles, PageSize};
use crate::theme::Theme;

/// Storage keys.
pub mod keys {
    pub const PAGE_LENGTH: &str = "page-length";
    pub const FILTERS: &str = "filters";
    pub const EXPORT_IGNORE_FILTERS: &str = "export-ignore-filters";
    pub const THEME: &str = "theme";
}

/// Preferences that survive a reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub page_size: PageSize,
    pub toggles: FilterToggles,
    pub ignore_export_filters: bool,
    pub theme: Theme,
}

impl Preferences {
    /// Loads every preference.
    ///
    /// Each key falls back to its default on its own when it is missing,
    /// unreadable or out of range, so one corrupt value never discards the
    /// others.
    pub async fn load(settings: &SettingsProvider) -> Self {
        let defaults = Self::default();
        let stored = load_or(settings, keys::PAGE_LENGTH, u32::from(defaults.page_size)).await;
        let page_size = PageSize::try_from(stored).unwrap_or_else(|e| {
            log::warn!("Ignoring stored page size: {e}");
            defaults.page_size
        });
        Self {
            page_size,
            toggles: load_or(settings, keys::FILTERS, defaults.toggles).await,
            ignore_export_filters: load_or(settings, keys::EXPORT_IGNORE_FILTERS, false).await,
            theme: load_or(settings, keys::THEME, defaults.theme).await,
        }
    }

    /// Writes every preference.
    pub async fn save(&self, settings: &SettingsProvider) -> Result<(), SettingsError> {
        settings.set(keys::PAGE_LENGTH, &u32::from(self.page_size)).await?;
        settings.set(keys::FILTERS, &self.toggles).await?;
        settings
            .set(keys::EXPORT_IGNORE_FILTERS, &self.ignore_export_filters)
            .await?;
        settings.set(keys::THEME, &self.theme).await?;
        log::debug!("Saved preferences: {self:?}");
        Ok(())
    }
}

async fn load_or<T: DeserializeOwned>(settings: &SettingsProvider, key: &str, default: T) -> T {
    match settings.get(key).await {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            log::warn!("Ignoring stored preference {key}: {e}");
            default
        }
    }
}
