//! A reconciler wired to its data source and preference store.

use std::time::Duration;

use crate::nav::NavConfig;
use crate::settings::{Preferences, SettingsProvider};
use crate::source::{DataSource, load_records};
use crate::view::{Effect, Event, LayoutProbe, Reconciler, RenderPlan};

/// One running table view.
///
/// Loads preferences and data once at startup and saves preferences after
/// every event that changes them. Errors at either boundary are logged and
/// never reach the caller.
pub struct Session {
    reconciler: Reconciler,
    settings: SettingsProvider,
}

impl Session {
    /// Restores preferences, loads the records and renders the first plan.
    pub async fn open(source: &dyn DataSource, settings: SettingsProvider, nav_config: NavConfig) -> Self {
        let prefs = Preferences::load(&settings).await;
        let mut reconciler = Reconciler::with_preferences(&prefs, nav_config);
        let records = load_records(source).await;
        reconciler.dispatch(Event::Load(records));
        Self {
            reconciler,
            settings,
        }
    }

    /// Applies an event and persists preferences if they changed.
    pub async fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let update = self.reconciler.dispatch(event);
        if update.preferences_changed {
            let prefs = self.reconciler.state().preferences();
            if let Err(e) = prefs.save(&self.settings).await {
                log::error!("Failed to save preferences: {e}");
            }
        }
        update.effects
    }

    /// See [`Reconciler::on_frame`].
    pub fn on_frame(&mut self, probe: &dyn LayoutProbe) -> Vec<Effect> {
        self.reconciler.on_frame(probe)
    }

    /// See [`Reconciler::advance`].
    pub fn advance(&mut self, dt: Duration, probe: &dyn LayoutProbe) -> Vec<Effect> {
        self.reconciler.advance(dt, probe)
    }

    pub fn plan(&self) -> &RenderPlan {
        self.reconciler.plan()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn settings(&self) -> &SettingsProvider {
        &self.settings
    }
}
